//! Zusammenhangs-Traversierung über bestehende Verbindungen.

use std::collections::{HashMap, VecDeque};

use glam::DVec2;
use indexmap::IndexSet;

use super::{EdgeId, TrackGraph};

impl TrackGraph {
    /// Direkte Nachbarn eines Gleises, in Port-Reihenfolge.
    pub fn neighbors(&self, edge: EdgeId) -> Vec<EdgeId> {
        let Some(track_edge) = self.edge(edge) else {
            return Vec::new();
        };
        let mut result = Vec::with_capacity(track_edge.endpoints.len());
        for port in track_edge.endpoints.keys() {
            if let Some(peer) = self.connected_port(edge, port.as_str()) {
                if peer.edge != edge && !result.contains(&peer.edge) {
                    result.push(peer.edge);
                }
            }
        }
        result
    }

    /// Alle über Verbindungen erreichbaren Gleise, Start zuerst (BFS-Reihenfolge).
    ///
    /// Leer, wenn das Startgleis nicht existiert.
    pub fn connected_group(&self, start: EdgeId) -> IndexSet<EdgeId> {
        let mut visited = IndexSet::new();
        if !self.contains_edge(start) {
            return visited;
        }

        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Verschiebt die ganze Gruppe um `delta`. Rotationen bleiben unverändert.
    ///
    /// Gibt die Anzahl bewegter Gleise zurück.
    pub fn move_group(&mut self, start: EdgeId, delta: DVec2) -> usize {
        let group = self.connected_group(start);
        for id in &group {
            self.translate_edge(*id, delta);
        }
        group.len()
    }

    /// Kürzeste Gleisfolge zwischen zwei Gleisen (beide Enden inklusive).
    pub fn shortest_path(&self, from: EdgeId, to: EdgeId) -> Option<Vec<EdgeId>> {
        if !self.contains_edge(from) || !self.contains_edge(to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut previous: HashMap<EdgeId, EdgeId> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if next == from || previous.contains_key(&next) {
                    continue;
                }
                previous.insert(next, current);
                if next == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(prev) = previous.get(&cursor) {
                        path.push(*prev);
                        cursor = *prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::TrackTemplate;
    use approx::assert_abs_diff_eq;

    /// Kette E1–E2–E3 plus einzelnes E4.
    fn chain() -> (TrackGraph, Vec<EdgeId>) {
        let template = TrackTemplate::straight("G231", 231.0);
        let mut graph = TrackGraph::new();
        let ids: Vec<EdgeId> = (0..4)
            .map(|i| graph.add_edge(&template, DVec2::new(i as f64 * 231.0, 0.0), 0.0))
            .collect();
        assert!(graph.try_connect(ids[0], "B", ids[1], "A"));
        assert!(graph.try_connect(ids[1], "B", ids[2], "A"));
        (graph, ids)
    }

    #[test]
    fn gruppe_enthaelt_start_und_ist_symmetrisch() {
        let (graph, ids) = chain();
        let group = graph.connected_group(ids[0]);
        assert_eq!(group.iter().copied().collect::<Vec<_>>(), vec![ids[0], ids[1], ids[2]]);
        for member in &group {
            assert!(graph.connected_group(*member).contains(&ids[0]));
        }
        let single = graph.connected_group(ids[3]);
        assert_eq!(single.len(), 1);
        assert!(single.contains(&ids[3]));
        assert!(graph.connected_group(EdgeId(99)).is_empty());
    }

    #[test]
    fn gruppe_terminiert_bei_schleife() {
        let (mut graph, ids) = chain();
        assert!(graph.try_connect(ids[2], "B", ids[3], "A"));
        assert!(graph.try_connect(ids[3], "B", ids[0], "A"));
        assert_eq!(graph.connected_group(ids[1]).len(), 4);
    }

    #[test]
    fn move_group_verschiebt_nur_verbundene() {
        let (mut graph, ids) = chain();
        assert_eq!(graph.move_group(ids[1], DVec2::new(10.0, -5.0)), 3);
        let pos = |id: EdgeId| graph.edge(id).map(|e| e.position).unwrap_or(DVec2::NAN);
        assert_abs_diff_eq!(pos(ids[0]).x, 10.0);
        assert_abs_diff_eq!(pos(ids[2]).y, -5.0);
        assert_abs_diff_eq!(pos(ids[3]).x, 693.0);
    }

    #[test]
    fn shortest_path_folgt_verbindungen() {
        let (graph, ids) = chain();
        assert_eq!(graph.shortest_path(ids[0], ids[2]), Some(vec![ids[0], ids[1], ids[2]]));
        assert_eq!(graph.shortest_path(ids[1], ids[1]), Some(vec![ids[1]]));
        assert_eq!(graph.shortest_path(ids[0], ids[3]), None);
        assert_eq!(graph.shortest_path(ids[0], EdgeId(99)), None);
    }
}
