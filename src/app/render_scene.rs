//! Builder für das Render-Read-Modell aus der Session.

use crate::app::TrackPlanSession;
use crate::shared::{EdgeView, PortView, TrackPlanScene};

/// Baut eine TrackPlanScene aus dem aktuellen Session-Zustand.
pub fn build(session: &TrackPlanSession) -> TrackPlanScene {
    let edges = session
        .graph
        .edges_sorted()
        .into_iter()
        .map(|edge| EdgeView {
            id: edge.id,
            template_id: edge.template_id.clone(),
            position: edge.position,
            rotation_deg: edge.rotation_deg,
            feedback_point: edge.feedback_point,
            ports: edge
                .ports
                .iter()
                .filter_map(|port| {
                    Some(PortView {
                        id: port.clone(),
                        world_position: edge.port_world_position(port.as_str())?,
                        facing_deg: edge.port_facing_angle(port.as_str())?,
                        connected: edge.is_port_connected(port.as_str()),
                        end_cap: edge.is_end_capped(port.as_str()),
                    })
                })
                .collect(),
        })
        .collect();

    let dragging = session
        .drag
        .as_ref()
        .map(|drag| drag.group.iter().copied().collect())
        .unwrap_or_default();

    TrackPlanScene { edges, dragging }
}
