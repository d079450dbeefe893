//! Der zentrale Gleisgraph: Arenen für Gleisstücke (Edges) und Knoten.
//!
//! Querverweise laufen ausschließlich über IDs. Verbindungslogik
//! (`try_connect`, `disconnect`, ...) liegt in `connection.rs`.

use super::catalog::{TrackGeometry, TrackTemplate};
use super::geometry;
use super::{EdgeId, NodeId, PortId, PortRef};
use glam::DVec2;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Verbindungsdatensatz eines Ports. Existiert nur, solange der Port verbunden ist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Knoten, an dem der Port hängt
    pub node: NodeId,
    /// Gegenstelle am selben Knoten
    pub peer: PortRef,
}

/// Verbindungspunkt zwischen Gleisenden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackNode {
    pub id: NodeId,
    /// Alle Ports, die an diesem Knoten zusammenlaufen
    pub occupants: Vec<PortRef>,
}

impl TrackNode {
    pub fn contains(&self, edge: EdgeId, port: &str) -> bool {
        self.occupants
            .iter()
            .any(|o| o.edge == edge && o.port.as_str() == port)
    }
}

/// Ein platziertes Gleisstück.
///
/// Port-Liste und Geometrie werden bei der Platzierung aus der Katalog-Vorlage
/// übernommen; `template_id` bleibt als Verweis erhalten.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEdge {
    pub id: EdgeId,
    pub template_id: String,
    pub ports: Vec<PortId>,
    pub geometry: TrackGeometry,
    /// Position der Gleismitte in mm
    pub position: DVec2,
    /// Rotation in Grad, immer in [0, 360)
    pub rotation_deg: f64,
    /// Verbundene Ports → Endpunkt; fehlender Eintrag = offen
    pub endpoints: BTreeMap<PortId, Endpoint>,
    /// Rückmelder-Nummer (extern vergeben)
    pub feedback_point: Option<u32>,
    /// Ports mit Prellbock
    pub end_caps: BTreeSet<PortId>,
}

impl TrackEdge {
    fn from_template(id: EdgeId, template: &TrackTemplate, position: DVec2, rotation_deg: f64) -> Self {
        Self {
            id,
            template_id: template.id.clone(),
            ports: template.ports.clone(),
            geometry: template.geometry,
            position,
            rotation_deg: geometry::normalize_deg(rotation_deg),
            endpoints: BTreeMap::new(),
            feedback_point: None,
            end_caps: BTreeSet::new(),
        }
    }

    pub fn has_port(&self, port: &str) -> bool {
        self.ports.iter().any(|p| p.as_str() == port)
    }

    pub fn is_port_connected(&self, port: &str) -> bool {
        self.endpoints.contains_key(port)
    }

    pub fn is_end_capped(&self, port: &str) -> bool {
        self.end_caps.contains(port)
    }

    /// Weltposition eines Ports.
    pub fn port_world_position(&self, port: &str) -> Option<DVec2> {
        geometry::port_world_offset(&self.geometry, port, self.rotation_deg)
            .map(|offset| self.position + offset)
    }

    /// Nach außen zeigende Richtung eines Ports in Weltkoordinaten.
    pub fn port_facing_angle(&self, port: &str) -> Option<f64> {
        geometry::port_facing_angle(&self.geometry, port, self.rotation_deg)
    }

    /// Ports ohne Verbindung und ohne Prellbock.
    pub fn open_ports(&self) -> impl Iterator<Item = &PortId> + '_ {
        self.ports
            .iter()
            .filter(|p| !self.endpoints.contains_key(p.as_str()) && !self.end_caps.contains(p.as_str()))
    }
}

/// Besitzt alle Gleisstücke und Knoten eines Gleisplans.
#[derive(Debug, Clone, Default)]
pub struct TrackGraph {
    pub(crate) edges: HashMap<EdgeId, TrackEdge>,
    pub(crate) nodes: HashMap<NodeId, TrackNode>,
    next_edge_id: u64,
    next_node_id: u64,
}

impl TrackGraph {
    /// Erstellt einen leeren Graphen.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
            nodes: HashMap::new(),
            next_edge_id: 1,
            next_node_id: 1,
        }
    }

    /// Platziert ein neues Gleisstück und gibt seine ID zurück.
    pub fn add_edge(&mut self, template: &TrackTemplate, position: DVec2, rotation_deg: f64) -> EdgeId {
        let id = EdgeId(self.next_edge_id.max(1));
        self.next_edge_id = id.0.saturating_add(1);
        self.edges
            .insert(id, TrackEdge::from_template(id, template, position, rotation_deg));
        id
    }

    /// Fügt ein Gleisstück unter einer vorgegebenen ID ein (Laden von Snapshots).
    ///
    /// Gibt `false` zurück, wenn die ID bereits vergeben ist oder keine
    /// Folge-ID mehr zulässt (`u64::MAX`).
    pub fn insert_edge_with_id(
        &mut self,
        id: EdgeId,
        template: &TrackTemplate,
        position: DVec2,
        rotation_deg: f64,
    ) -> bool {
        if self.edges.contains_key(&id) {
            return false;
        }
        let Some(next) = id.0.checked_add(1) else {
            return false;
        };
        self.next_edge_id = self.next_edge_id.max(next);
        self.edges
            .insert(id, TrackEdge::from_template(id, template, position, rotation_deg));
        true
    }

    /// Entfernt ein Gleisstück. Noch verbundene Ports werden vorher getrennt.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<TrackEdge> {
        let connected: Vec<PortId> = self.edges.get(&id)?.endpoints.keys().cloned().collect();
        if !connected.is_empty() {
            log::warn!(
                "Gleis {} wird mit {} offenen Verbindungen entfernt, trenne automatisch",
                id,
                connected.len()
            );
            for port in &connected {
                self.disconnect(id, port.as_str());
            }
        }
        self.edges.remove(&id)
    }

    /// Legt einen leeren Knoten an.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id.max(1));
        self.next_node_id = id.0 + 1;
        self.nodes.insert(
            id,
            TrackNode {
                id,
                occupants: Vec::new(),
            },
        );
        id
    }

    /// Entfernt einen Knoten ohne Belegung.
    pub fn remove_empty_node(&mut self, id: NodeId) -> bool {
        match self.nodes.get(&id) {
            Some(node) if node.occupants.is_empty() => {
                self.nodes.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&TrackEdge> {
        self.edges.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&TrackNode> {
        self.nodes.get(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Alle Edge-IDs aufsteigend sortiert.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.edges.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Alle Gleisstücke in ID-Reihenfolge.
    pub fn edges_sorted(&self) -> Vec<&TrackEdge> {
        let mut edges: Vec<&TrackEdge> = self.edges.values().collect();
        edges.sort_unstable_by_key(|e| e.id);
        edges
    }

    /// Alle Knoten in ID-Reihenfolge.
    pub fn nodes_sorted(&self) -> Vec<&TrackNode> {
        let mut nodes: Vec<&TrackNode> = self.nodes.values().collect();
        nodes.sort_unstable_by_key(|n| n.id);
        nodes
    }

    /// Setzt die Position eines Gleisstücks. Verbindungen bleiben unberührt.
    pub fn set_edge_position(&mut self, id: EdgeId, position: DVec2) -> bool {
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        edge.position = position;
        true
    }

    /// Setzt die Rotation (wird normalisiert). Nachbarn drehen nicht mit.
    pub fn set_edge_rotation(&mut self, id: EdgeId, rotation_deg: f64) -> bool {
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        edge.rotation_deg = geometry::normalize_deg(rotation_deg);
        true
    }

    /// Verschiebt ein Gleisstück relativ.
    pub fn translate_edge(&mut self, id: EdgeId, delta: DVec2) -> bool {
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        edge.position += delta;
        true
    }

    pub fn set_feedback_point(&mut self, id: EdgeId, feedback_point: Option<u32>) -> bool {
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        edge.feedback_point = feedback_point;
        true
    }

    /// Setzt oder entfernt einen Prellbock. Verbundene Ports können nicht abgeschlossen werden.
    pub fn set_end_cap(&mut self, id: EdgeId, port: &str, capped: bool) -> bool {
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        if !edge.has_port(port) {
            return false;
        }
        if capped {
            if edge.is_port_connected(port) {
                return false;
            }
            edge.end_caps.insert(PortId::from(port));
        } else {
            edge.end_caps.remove(port);
        }
        true
    }

    /// Weltposition eines Ports.
    pub fn port_world_position(&self, edge: EdgeId, port: &str) -> Option<DVec2> {
        self.edges.get(&edge)?.port_world_position(port)
    }

    /// Weltrichtung eines Ports.
    pub fn port_facing_angle(&self, edge: EdgeId, port: &str) -> Option<f64> {
        self.edges.get(&edge)?.port_facing_angle(port)
    }

    /// Leert den Graphen. ID-Zähler laufen weiter, damit alte IDs ungültig bleiben.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.nodes.clear();
    }

    pub(crate) fn allocate_node(&mut self, occupants: Vec<PortRef>) -> NodeId {
        let id = self.add_node();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.occupants = occupants;
        }
        id
    }
}
