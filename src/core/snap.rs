//! Snap-and-Connect: richtet ein Gleisstück an einem nahen offenen Port aus
//! und verbindet die beiden Ports.
//!
//! Pro Aufruf entsteht höchstens eine neue Verbindung. Reihenfolge je Kandidat:
//! erst Rotation und Position setzen, dann verbinden.

use std::collections::HashSet;

use glam::DVec2;
use indexmap::IndexSet;

use super::geometry;
use super::{EdgeId, PortIndex, PortRef, TrackGraph};

/// Toleranzen für die Snap-Suche.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSettings {
    /// Ports rasten nur ein, wenn ihr Abstand echt kleiner ist
    pub distance_mm: f64,
    /// Erlaubte Richtungsabweichung, wenn nicht gedreht werden darf
    pub angle_tolerance_deg: f64,
}

/// Ein gefundenes Snap-Ziel samt der Pose, die das bewegte Gleis danach hat.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate {
    /// Port des bewegten Gleises
    pub moving: PortRef,
    /// Offener Port eines anderen Gleises
    pub target: PortRef,
    /// Abstand der beiden Ports vor dem Einrasten
    pub distance: f64,
    /// Neue Position des bewegten Gleises
    pub position: DVec2,
    /// Neue Rotation des bewegten Gleises
    pub rotation_deg: f64,
}

fn sort_candidates(candidates: &mut [SnapCandidate]) {
    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.target.cmp(&b.target))
            .then_with(|| a.moving.cmp(&b.moving))
    });
}

/// Alle Snap-Kandidaten eines Gleises, bestes zuerst. Das Gleis darf dabei gedreht werden.
pub fn snap_candidates(graph: &TrackGraph, edge_id: EdgeId, settings: &SnapSettings) -> Vec<SnapCandidate> {
    let Some(edge) = graph.edge(edge_id) else {
        return Vec::new();
    };
    let excluded: HashSet<EdgeId> = HashSet::from([edge_id]);
    let index = PortIndex::from_open_ports(graph, &excluded);

    let mut candidates = Vec::new();
    for port in edge.open_ports() {
        let Some(world) = edge.port_world_position(port.as_str()) else {
            continue;
        };
        for hit in index.within_radius(world, settings.distance_mm) {
            if hit.distance >= settings.distance_mm {
                continue;
            }
            let Some(target_facing) = graph.port_facing_angle(hit.port.edge, hit.port.port.as_str())
            else {
                continue;
            };
            // Ports müssen einander gegenüberstehen
            let Some(rotation_deg) =
                geometry::rotation_for_facing(&edge.geometry, port.as_str(), target_facing + 180.0)
            else {
                continue;
            };
            let Some(position) =
                geometry::position_for_port(&edge.geometry, port.as_str(), rotation_deg, hit.position)
            else {
                continue;
            };
            candidates.push(SnapCandidate {
                moving: PortRef::new(edge_id, port.clone()),
                target: hit.port,
                distance: hit.distance,
                position,
                rotation_deg,
            });
        }
    }

    sort_candidates(&mut candidates);
    candidates
}

/// Bestes Snap-Ziel ohne Mutation (Vorschau während des Ziehens).
pub fn find_snap_target(graph: &TrackGraph, edge_id: EdgeId, settings: &SnapSettings) -> Option<SnapCandidate> {
    snap_candidates(graph, edge_id, settings).into_iter().next()
}

/// Richtet das Gleis am besten Kandidaten aus und verbindet die Ports.
///
/// Scheitert das Verbinden, wird die alte Pose wiederhergestellt und der
/// nächste Kandidat versucht. Ist das Gleis bereits verbunden, rastet die
/// ganze zusammenhängende Gruppe per [`snap_group`] ein.
pub fn try_snap_and_connect(
    graph: &mut TrackGraph,
    edge_id: EdgeId,
    settings: &SnapSettings,
) -> Option<SnapCandidate> {
    let (old_position, old_rotation) = {
        let edge = graph.edge(edge_id)?;
        (edge.position, edge.rotation_deg)
    };

    let group = graph.connected_group(edge_id);
    if group.len() > 1 {
        log::debug!("Gleis {} ist Teil einer Gruppe ({} Gleise)", edge_id, group.len());
        return snap_group(graph, &group, settings);
    }

    let candidates = snap_candidates(graph, edge_id, settings);
    if candidates.is_empty() {
        log::debug!("Kein Snap-Ziel für Gleis {} gefunden", edge_id);
        return None;
    }

    for candidate in candidates {
        graph.set_edge_rotation(edge_id, candidate.rotation_deg);
        graph.set_edge_position(edge_id, candidate.position);
        if graph.try_connect(
            candidate.moving.edge,
            candidate.moving.port.as_str(),
            candidate.target.edge,
            candidate.target.port.as_str(),
        ) {
            log::info!(
                "Gleis {} eingerastet: {} → {} (Abstand {:.2} mm)",
                edge_id,
                candidate.moving,
                candidate.target,
                candidate.distance
            );
            return Some(candidate);
        }
        graph.set_edge_position(edge_id, old_position);
        graph.set_edge_rotation(edge_id, old_rotation);
    }

    None
}

/// Snap-Kandidaten für eine starre Gruppe: nur Verschiebung, keine Drehung.
///
/// Kandidaten, deren Richtung um mehr als `angle_tolerance_deg` von
/// "gegenüberliegend" abweicht, entfallen.
pub fn group_snap_candidates(
    graph: &TrackGraph,
    group: &IndexSet<EdgeId>,
    settings: &SnapSettings,
) -> Vec<SnapCandidate> {
    let excluded: HashSet<EdgeId> = group.iter().copied().collect();
    let index = PortIndex::from_open_ports(graph, &excluded);
    if index.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for edge_id in group {
        let Some(edge) = graph.edge(*edge_id) else {
            continue;
        };
        for port in edge.open_ports() {
            let (Some(world), Some(facing)) = (
                edge.port_world_position(port.as_str()),
                edge.port_facing_angle(port.as_str()),
            ) else {
                continue;
            };
            for hit in index.within_radius(world, settings.distance_mm) {
                if hit.distance >= settings.distance_mm {
                    continue;
                }
                let Some(target_facing) =
                    graph.port_facing_angle(hit.port.edge, hit.port.port.as_str())
                else {
                    continue;
                };
                if geometry::angle_deviation(facing, target_facing + 180.0) > settings.angle_tolerance_deg {
                    continue;
                }
                candidates.push(SnapCandidate {
                    moving: PortRef::new(*edge_id, port.clone()),
                    target: hit.port,
                    distance: hit.distance,
                    position: edge.position + (hit.position - world),
                    rotation_deg: edge.rotation_deg,
                });
            }
        }
    }

    sort_candidates(&mut candidates);
    candidates
}

/// Verschiebt die ganze Gruppe auf den besten Kandidaten und verbindet.
pub fn snap_group(
    graph: &mut TrackGraph,
    group: &IndexSet<EdgeId>,
    settings: &SnapSettings,
) -> Option<SnapCandidate> {
    for candidate in group_snap_candidates(graph, group, settings) {
        let Some(current) = graph.edge(candidate.moving.edge).map(|e| e.position) else {
            continue;
        };
        let delta = candidate.position - current;
        for id in group {
            graph.translate_edge(*id, delta);
        }
        if graph.try_connect(
            candidate.moving.edge,
            candidate.moving.port.as_str(),
            candidate.target.edge,
            candidate.target.port.as_str(),
        ) {
            log::info!(
                "Gruppe ({} Gleise) eingerastet: {} → {}",
                group.len(),
                candidate.moving,
                candidate.target
            );
            return Some(candidate);
        }
        for id in group {
            graph.translate_edge(*id, -delta);
        }
    }
    None
}
