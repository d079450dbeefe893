//! Standardregeln des Validators.

use std::collections::{BTreeMap, HashSet};

use super::{ConstraintRule, Severity, ValidationContext, Violation};
use crate::core::catalog::TrackKind;
use crate::core::geometry;
use crate::core::{EdgeId, PortId, PortRef, TrackGraph};

// ── Abzweig ─────────────────────────────────────────────────────────

/// Der Abzweig (Port C) jeder Weiche muss an einer weiteren Weiche oder einem
/// Prellbock enden. Eine geschlossene Schleife gilt ebenfalls als abgeschlossen.
pub struct UnterminatedDivergingRouteRule;

enum RouteEnd {
    Terminated,
    Open(EdgeId),
}

fn is_switch(graph: &TrackGraph, edge: EdgeId) -> bool {
    graph
        .edge(edge)
        .is_some_and(|e| e.geometry.kind() == TrackKind::Switch)
}

fn follow_route(graph: &TrackGraph, start: PortRef) -> RouteEnd {
    let mut visited: HashSet<EdgeId> = HashSet::from([start.edge]);
    let mut current = start;
    loop {
        let Some(edge) = graph.edge(current.edge) else {
            return RouteEnd::Terminated;
        };
        if edge.is_end_capped(current.port.as_str()) {
            return RouteEnd::Terminated;
        }
        if !edge.is_port_connected(current.port.as_str()) {
            return RouteEnd::Open(current.edge);
        }
        // Verbunden, aber ohne Gegenstelle: meldet die Integritätsregel
        let Some(peer) = graph.connected_port(current.edge, current.port.as_str()) else {
            return RouteEnd::Terminated;
        };
        if is_switch(graph, peer.edge) || !visited.insert(peer.edge) {
            return RouteEnd::Terminated;
        }
        let Some(next_port) = graph
            .edge(peer.edge)
            .and_then(|e| e.ports.iter().find(|p| **p != peer.port).cloned())
        else {
            return RouteEnd::Terminated;
        };
        current = PortRef::new(peer.edge, next_port);
    }
}

impl ConstraintRule for UnterminatedDivergingRouteRule {
    fn id(&self) -> &'static str {
        "unterminated-diverging-route"
    }

    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
        for edge in ctx.graph.edges_sorted() {
            if edge.geometry.kind() != TrackKind::Switch || !edge.has_port("C") {
                continue;
            }
            if let RouteEnd::Open(end) = follow_route(ctx.graph, PortRef::new(edge.id, PortId::c())) {
                let mut edges = vec![edge.id];
                if end != edge.id {
                    edges.push(end);
                }
                out.push(Violation {
                    rule: self.id(),
                    severity: Severity::Warning,
                    message: format!(
                        "Abzweig von Weiche {} ({}) endet offen an Gleis {}",
                        edge.id, edge.template_id, end
                    ),
                    edges,
                    nodes: Vec::new(),
                });
            }
        }
    }
}

// ── Knotenbelegung ──────────────────────────────────────────────────

/// Ein Knoten darf höchstens zwei Gleisenden verbinden.
pub struct OverConnectedNodeRule;

impl ConstraintRule for OverConnectedNodeRule {
    fn id(&self) -> &'static str {
        "over-connected-node"
    }

    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
        for node in ctx.graph.nodes_sorted() {
            if node.occupants.len() <= crate::core::SIMPLE_JUNCTION_OCCUPANTS {
                continue;
            }
            let mut edges: Vec<EdgeId> = node.occupants.iter().map(|o| o.edge).collect();
            edges.sort_unstable();
            edges.dedup();
            out.push(Violation {
                rule: self.id(),
                severity: Severity::Error,
                message: format!(
                    "Knoten {} verbindet {} Gleisenden (maximal 2)",
                    node.id,
                    node.occupants.len()
                ),
                edges,
                nodes: vec![node.id],
            });
        }
    }
}

// ── Rückmelder ──────────────────────────────────────────────────────

/// Rückmelder-Nummern müssen eindeutig sein.
pub struct DuplicateFeedbackAddressRule;

impl ConstraintRule for DuplicateFeedbackAddressRule {
    fn id(&self) -> &'static str {
        "duplicate-feedback-address"
    }

    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
        let mut by_address: BTreeMap<u32, Vec<EdgeId>> = BTreeMap::new();
        for edge in ctx.graph.edges_sorted() {
            if let Some(address) = edge.feedback_point {
                by_address.entry(address).or_default().push(edge.id);
            }
        }
        for (address, edges) in by_address {
            if edges.len() < 2 {
                continue;
            }
            out.push(Violation {
                rule: self.id(),
                severity: Severity::Error,
                message: format!("Rückmelder {} ist {} Gleisen zugeordnet", address, edges.len()),
                edges,
                nodes: Vec::new(),
            });
        }
    }
}

// ── Integrität ──────────────────────────────────────────────────────

/// Endpunkte und Knotenbelegung müssen sich gegenseitig bestätigen.
pub struct DanglingEndpointRule;

impl ConstraintRule for DanglingEndpointRule {
    fn id(&self) -> &'static str {
        "dangling-endpoint"
    }

    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
        let graph = ctx.graph;
        for edge in graph.edges_sorted() {
            for (port, endpoint) in &edge.endpoints {
                let problem = match graph.node(endpoint.node) {
                    None => Some(format!("verweist auf fehlenden Knoten {}", endpoint.node)),
                    Some(node) if !node.contains(edge.id, port.as_str()) => {
                        Some(format!("fehlt in der Belegung von Knoten {}", endpoint.node))
                    }
                    Some(node) if !node.contains(endpoint.peer.edge, endpoint.peer.port.as_str()) => {
                        Some(format!("nennt Gegenstelle {} außerhalb des Knotens", endpoint.peer))
                    }
                    Some(_) => None,
                };
                if let Some(problem) = problem {
                    out.push(Violation {
                        rule: self.id(),
                        severity: Severity::Error,
                        message: format!("Port {}.{} {}", edge.id, port, problem),
                        edges: vec![edge.id],
                        nodes: vec![endpoint.node],
                    });
                }
            }
        }

        for node in graph.nodes_sorted() {
            for occupant in &node.occupants {
                let confirmed = graph
                    .edge(occupant.edge)
                    .and_then(|e| e.endpoints.get(occupant.port.as_str()))
                    .is_some_and(|ep| ep.node == node.id);
                if !confirmed {
                    out.push(Violation {
                        rule: self.id(),
                        severity: Severity::Error,
                        message: format!(
                            "Knoten {} führt {} ohne passenden Endpunkt",
                            node.id, occupant
                        ),
                        edges: vec![occupant.edge],
                        nodes: vec![node.id],
                    });
                }
            }
        }
    }
}

// ── Geometrie ───────────────────────────────────────────────────────

/// Verbundene Ports müssen deckungsgleich liegen und einander gegenüberstehen.
pub struct MisalignedConnectionRule;

impl ConstraintRule for MisalignedConnectionRule {
    fn id(&self) -> &'static str {
        "misaligned-connection"
    }

    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>) {
        let graph = ctx.graph;
        for edge in graph.edges_sorted() {
            for port in edge.endpoints.keys() {
                let Some(peer) = graph.connected_port(edge.id, port.as_str()) else {
                    continue;
                };
                let own = PortRef::new(edge.id, port.clone());
                // Jedes Paar nur einmal prüfen
                if peer < own {
                    continue;
                }
                let (Some(a), Some(b), Some(fa), Some(fb)) = (
                    edge.port_world_position(port.as_str()),
                    graph.port_world_position(peer.edge, peer.port.as_str()),
                    edge.port_facing_angle(port.as_str()),
                    graph.port_facing_angle(peer.edge, peer.port.as_str()),
                ) else {
                    continue;
                };
                let gap = a.distance(b);
                let deviation = geometry::angle_deviation(fa, fb + 180.0);
                if gap > ctx.alignment.distance_mm || deviation > ctx.alignment.angle_deg {
                    let node = edge.endpoints.get(port.as_str()).map(|ep| ep.node);
                    out.push(Violation {
                        rule: self.id(),
                        severity: Severity::Warning,
                        message: format!(
                            "Verbindung {}↔{} versetzt: Abstand {:.2} mm, Winkelabweichung {:.1}°",
                            own, peer, gap, deviation
                        ),
                        edges: vec![edge.id, peer.edge],
                        nodes: node.into_iter().collect(),
                    });
                }
            }
        }
    }
}
