//! Use-Cases: Zusammenhängende Gleisgruppen.

use glam::DVec2;
use indexmap::IndexSet;

use crate::app::TrackPlanSession;
use crate::core::EdgeId;

/// Alle über Verbindungen erreichbaren Gleise, Start zuerst.
pub fn connected_group(session: &TrackPlanSession, edge: EdgeId) -> IndexSet<EdgeId> {
    session.graph.connected_group(edge)
}

/// Verschiebt die ganze Gruppe des Gleises um `delta`.
pub fn move_group(session: &mut TrackPlanSession, edge: EdgeId, delta: DVec2) -> usize {
    if delta == DVec2::ZERO {
        return 0;
    }
    let moved = session.graph.move_group(edge, delta);
    log::debug!("Gruppe von Gleis {} verschoben: {} Gleise", edge, moved);
    moved
}

/// Kürzeste Gleisfolge zwischen zwei Gleisen.
pub fn shortest_path(session: &TrackPlanSession, from: EdgeId, to: EdgeId) -> Option<Vec<EdgeId>> {
    session.graph.shortest_path(from, to)
}
