//! Spatial-Index (KD-Tree) über offenen Ports für die Snap-Suche.

use std::collections::HashSet;

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::{EdgeId, PortRef, TrackGraph};

/// Ergebnis einer Distanzabfrage gegen den Port-Index.
#[derive(Debug, Clone, PartialEq)]
pub struct PortMatch {
    /// Gefundener Port
    pub port: PortRef,
    /// Weltposition des Ports
    pub position: DVec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

/// Read-only Index über alle offenen, nicht abgeschlossenen Ports eines Graphen.
#[derive(Debug, Clone)]
pub struct PortIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<(PortRef, DVec2)>,
}

impl PortIndex {
    /// Baut den Index aus allen offenen Ports, außer denen der ausgeschlossenen Gleise.
    pub fn from_open_ports(graph: &TrackGraph, excluded: &HashSet<EdgeId>) -> Self {
        let mut entries: Vec<(PortRef, DVec2)> = Vec::new();
        for edge in graph.edges_sorted() {
            if excluded.contains(&edge.id) {
                continue;
            }
            for port in edge.open_ports() {
                if let Some(position) = edge.port_world_position(port.as_str()) {
                    entries.push((PortRef::new(edge.id, port.clone()), position));
                }
            }
        }

        let points: Vec<[f64; 2]> = entries.iter().map(|(_, p)| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&points).into();

        Self { tree, entries }
    }

    /// Gibt die Anzahl indexierter Ports zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Ports im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Findet alle offenen Ports innerhalb eines Radius.
    ///
    /// Sortiert nach Distanz, bei Gleichstand nach Port-Referenz.
    pub fn within_radius(&self, query: DVec2, radius: f64) -> Vec<PortMatch> {
        if self.is_empty() || radius.is_sign_negative() || radius.is_nan() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .filter_map(|entry| {
                let (port, position) = self.entries.get(entry.item as usize)?;
                Some(PortMatch {
                    port: port.clone(),
                    position: *position,
                    // Exakte Distanz statt der quadrierten KD-Tree-Distanz
                    distance: position.distance(query),
                })
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.port.cmp(&b.port))
        });
        results
    }
}
