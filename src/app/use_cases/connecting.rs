//! Use-Cases: Einrasten, Verbinden und Trennen.

use crate::app::TrackPlanSession;
use crate::core::{snap, EdgeId, SnapCandidate};

/// Rastet ein Gleis am nächsten offenen Port ein und verbindet genau ein Portpaar.
pub fn try_snap_and_connect(session: &mut TrackPlanSession, edge: EdgeId) -> Option<SnapCandidate> {
    let settings = session.options.snap_settings();
    snap::try_snap_and_connect(&mut session.graph, edge, &settings)
}

/// Vorschau des Snap-Ziels, ohne den Graphen zu verändern.
pub fn find_snap_target(session: &TrackPlanSession, edge: EdgeId) -> Option<SnapCandidate> {
    let settings = session.options.snap_settings();
    snap::find_snap_target(&session.graph, edge, &settings)
}

/// Verbindet zwei Ports direkt, ohne Geometrie anzupassen.
pub fn connect_ports(
    session: &mut TrackPlanSession,
    a_edge: EdgeId,
    a_port: &str,
    b_edge: EdgeId,
    b_port: &str,
) -> bool {
    session.graph.try_connect(a_edge, a_port, b_edge, b_port)
}

/// Trennt die Verbindung an einem Port.
pub fn disconnect(session: &mut TrackPlanSession, edge: EdgeId, port: &str) -> bool {
    session.graph.disconnect(edge, port)
}

/// Trennt alle Verbindungen eines Gleises.
pub fn disconnect_all(session: &mut TrackPlanSession, edge: EdgeId) -> usize {
    let count = session.graph.disconnect_all(edge);
    if count > 0 {
        log::info!("Gleis {}: {} Verbindungen getrennt", edge, count);
    }
    count
}
