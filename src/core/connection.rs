//! Verbindungs-Service: Port-zu-Port-Verbindungen auf dem [`TrackGraph`].
//!
//! Eine Verbindung ist kein eigenes Objekt, sondern der Zustand, in dem zwei
//! Ports über ihre Endpunkte auf denselben Knoten zeigen. Alle Operationen
//! melden Konflikte über `bool`/`Option`, nie über Panics.

use super::track_graph::{Endpoint, TrackGraph};
use super::{EdgeId, NodeId, PortId, PortRef};

/// Maximale Belegung eines Knotens bei einfachen Stößen.
pub const SIMPLE_JUNCTION_OCCUPANTS: usize = 2;

impl TrackGraph {
    /// Prüft, ob der Port einen Endpunkt besitzt.
    pub fn is_port_connected(&self, edge: EdgeId, port: &str) -> bool {
        self.edges
            .get(&edge)
            .is_some_and(|e| e.is_port_connected(port))
    }

    /// Löst über den gemeinsamen Knoten die Gegenstelle auf.
    pub fn connected_port(&self, edge: EdgeId, port: &str) -> Option<PortRef> {
        let endpoint = self.edges.get(&edge)?.endpoints.get(port)?;
        let node = self.nodes.get(&endpoint.node)?;
        if node.contains(endpoint.peer.edge, endpoint.peer.port.as_str()) {
            return Some(endpoint.peer.clone());
        }
        node.occupants
            .iter()
            .find(|o| !(o.edge == edge && o.port.as_str() == port))
            .cloned()
    }

    /// Alle Ports, die an einem Knoten hängen.
    pub fn ports_for_node(&self, node: NodeId) -> Vec<PortRef> {
        self.nodes
            .get(&node)
            .map(|n| n.occupants.clone())
            .unwrap_or_default()
    }

    /// Verbindet zwei offene Ports verschiedener Gleisstücke über einen neuen Knoten.
    ///
    /// Schlägt ohne Mutation fehl, wenn ein Gleis oder Port unbekannt ist,
    /// beide Ports zum selben Gleis gehören, einer der Ports bereits verbunden
    /// ist oder einen Prellbock trägt.
    pub fn try_connect(&mut self, a_edge: EdgeId, a_port: &str, b_edge: EdgeId, b_port: &str) -> bool {
        if a_edge == b_edge {
            log::debug!("Verbindung {}.{}↔{}.{} abgelehnt: gleiches Gleis", a_edge, a_port, b_edge, b_port);
            return false;
        }
        if !self.is_port_free(a_edge, a_port) || !self.is_port_free(b_edge, b_port) {
            log::debug!(
                "Verbindung {}.{}↔{}.{} abgelehnt: Port unbekannt, belegt oder abgeschlossen",
                a_edge,
                a_port,
                b_edge,
                b_port
            );
            return false;
        }

        let a = PortRef::new(a_edge, a_port);
        let b = PortRef::new(b_edge, b_port);
        let node = self.allocate_node(vec![a.clone(), b.clone()]);

        if let Some(edge) = self.edges.get_mut(&a_edge) {
            edge.endpoints.insert(
                PortId::from(a_port),
                Endpoint {
                    node,
                    peer: b.clone(),
                },
            );
        }
        if let Some(edge) = self.edges.get_mut(&b_edge) {
            edge.endpoints.insert(
                PortId::from(b_port),
                Endpoint {
                    node,
                    peer: a.clone(),
                },
            );
        }

        log::info!("Verbindung {}↔{} über Knoten {} erstellt", a, b, node);
        true
    }

    /// Hängt einen offenen Port an einen belegten Knoten, ohne Belegungsgrenze.
    ///
    /// Niedrige Ebene für Importe und Prüfwerkzeuge; der Editor verbindet über
    /// [`TrackGraph::try_connect`]. Ein leerer Knoten wird abgelehnt, da der
    /// Port dort keine Gegenstelle hätte.
    pub fn attach_port(&mut self, node: NodeId, edge: EdgeId, port: &str) -> bool {
        if !self.is_port_free(edge, port) {
            return false;
        }
        let Some(track_node) = self.nodes.get_mut(&node) else {
            return false;
        };
        let Some(peer) = track_node.occupants.first().cloned() else {
            log::debug!("Anhängen an {} abgelehnt: Knoten ist leer", node);
            return false;
        };
        track_node.occupants.push(PortRef::new(edge, port));

        if let Some(e) = self.edges.get_mut(&edge) {
            e.endpoints.insert(PortId::from(port), Endpoint { node, peer });
        }
        true
    }

    /// Trennt einen Port von seinem Knoten.
    ///
    /// Bleibt am Knoten höchstens eine Belegung übrig, wird auch diese
    /// geöffnet und der Knoten entfernt.
    pub fn disconnect(&mut self, edge: EdgeId, port: &str) -> bool {
        let Some(endpoint) = self
            .edges
            .get_mut(&edge)
            .and_then(|e| e.endpoints.remove(port))
        else {
            return false;
        };

        let node_id = endpoint.node;
        let remaining = match self.nodes.get_mut(&node_id) {
            Some(node) => {
                node.occupants
                    .retain(|o| !(o.edge == edge && o.port.as_str() == port));
                node.occupants.clone()
            }
            None => Vec::new(),
        };

        if remaining.len() < SIMPLE_JUNCTION_OCCUPANTS {
            for other in &remaining {
                if let Some(e) = self.edges.get_mut(&other.edge) {
                    e.endpoints.remove(other.port.as_str());
                }
            }
            self.nodes.remove(&node_id);
        } else {
            // Verweise auf den getrennten Port umhängen
            let removed = PortRef::new(edge, port);
            for (i, other) in remaining.iter().enumerate() {
                let Some(replacement) = remaining
                    .iter()
                    .enumerate()
                    .find(|(j, _)| *j != i)
                    .map(|(_, r)| r.clone())
                else {
                    continue;
                };
                if let Some(ep) = self
                    .edges
                    .get_mut(&other.edge)
                    .and_then(|e| e.endpoints.get_mut(other.port.as_str()))
                {
                    if ep.peer == removed {
                        ep.peer = replacement;
                    }
                }
            }
        }

        log::info!("Verbindung an {}.{} getrennt", edge, port);
        true
    }

    /// Trennt alle Ports eines Gleisstücks. Gibt die Anzahl getrennter Ports zurück.
    pub fn disconnect_all(&mut self, edge: EdgeId) -> usize {
        let ports: Vec<PortId> = match self.edges.get(&edge) {
            Some(e) => e.endpoints.keys().cloned().collect(),
            None => return 0,
        };
        ports
            .iter()
            .filter(|p| self.disconnect(edge, p.as_str()))
            .count()
    }

    /// Port existiert, ist offen und nicht abgeschlossen.
    fn is_port_free(&self, edge: EdgeId, port: &str) -> bool {
        self.edges.get(&edge).is_some_and(|e| {
            e.has_port(port) && !e.is_port_connected(port) && !e.is_end_capped(port)
        })
    }
}
