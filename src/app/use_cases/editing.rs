//! Use-Cases: Gleise platzieren, bewegen, drehen, löschen und attributieren.

use glam::DVec2;

use crate::app::TrackPlanSession;
use crate::core::EdgeId;

/// Platziert ein Gleis aus dem Katalog. `None`, wenn die Vorlage unbekannt ist.
pub fn add_edge(
    session: &mut TrackPlanSession,
    template_id: &str,
    position: DVec2,
    rotation_deg: f64,
) -> Option<EdgeId> {
    let Some(template) = session.catalog.template(template_id) else {
        log::warn!("Unbekannte Gleisvorlage: {}", template_id);
        return None;
    };
    let id = session.graph.add_edge(template, position, rotation_deg);
    log::info!(
        "Gleis {} ({}) platziert bei ({:.1}, {:.1}), {:.1}°",
        id,
        template_id,
        position.x,
        position.y,
        rotation_deg
    );
    Some(id)
}

/// Setzt die Position eines Gleises. Nachbarn bleiben stehen.
pub fn move_edge(session: &mut TrackPlanSession, edge: EdgeId, position: DVec2) -> bool {
    let moved = session.graph.set_edge_position(edge, position);
    if !moved {
        log::debug!("Verschieben ignoriert: Gleis {} existiert nicht", edge);
    }
    moved
}

/// Setzt die Rotation eines Gleises. Nachbarn drehen nicht mit.
pub fn rotate_edge(session: &mut TrackPlanSession, edge: EdgeId, rotation_deg: f64) -> bool {
    let rotated = session.graph.set_edge_rotation(edge, rotation_deg);
    if !rotated {
        log::debug!("Drehen ignoriert: Gleis {} existiert nicht", edge);
    }
    rotated
}

/// Löscht ein Gleis samt seiner Verbindungen.
///
/// Gehört das Gleis zu einem laufenden Drag, wird der Drag abgebrochen.
pub fn remove_edge(session: &mut TrackPlanSession, edge: EdgeId) -> bool {
    if session
        .drag
        .as_ref()
        .is_some_and(|drag| drag.group.contains(&edge))
    {
        super::drag::cancel_drag(session);
    }

    let disconnected = session.graph.disconnect_all(edge);
    match session.graph.remove_edge(edge) {
        Some(removed) => {
            log::info!(
                "Gleis {} ({}) gelöscht, {} Verbindungen getrennt",
                edge,
                removed.template_id,
                disconnected
            );
            true
        }
        None => {
            log::debug!("Löschen ignoriert: Gleis {} existiert nicht", edge);
            false
        }
    }
}

/// Setzt oder entfernt die Rückmelder-Nummer.
pub fn set_feedback_point(
    session: &mut TrackPlanSession,
    edge: EdgeId,
    feedback_point: Option<u32>,
) -> bool {
    session.graph.set_feedback_point(edge, feedback_point)
}

/// Setzt oder entfernt einen Prellbock an einem offenen Port.
pub fn set_end_cap(session: &mut TrackPlanSession, edge: EdgeId, port: &str, capped: bool) -> bool {
    let changed = session.graph.set_end_cap(edge, port, capped);
    if !changed {
        log::debug!("Prellbock an {}.{} nicht änderbar", edge, port);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_mit_unbekannter_vorlage_liefert_none() {
        let mut session = TrackPlanSession::with_builtin_catalog();
        assert!(add_edge(&mut session, "GIBTSNICHT", DVec2::ZERO, 0.0).is_none());
        assert_eq!(session.edge_count(), 0);
    }

    #[test]
    fn move_und_rotate_auf_veraltete_id_sind_no_ops() {
        let mut session = TrackPlanSession::with_builtin_catalog();
        let id = add_edge(&mut session, "G231", DVec2::ZERO, 0.0).expect("G231 bekannt");
        assert!(remove_edge(&mut session, id));
        assert!(!move_edge(&mut session, id, DVec2::ONE));
        assert!(!rotate_edge(&mut session, id, 90.0));
        assert!(!remove_edge(&mut session, id));
    }

    #[test]
    fn rotate_edge_dreht_nachbarn_nicht_mit() {
        let mut session = TrackPlanSession::with_builtin_catalog();
        let a = add_edge(&mut session, "G231", DVec2::ZERO, 0.0).expect("G231 bekannt");
        let b = add_edge(&mut session, "G231", DVec2::new(231.0, 0.0), 0.0).expect("G231 bekannt");
        assert!(session.graph.try_connect(a, "B", b, "A"));
        assert!(rotate_edge(&mut session, a, 45.0));
        assert_eq!(session.graph.edge(b).map(|e| e.rotation_deg), Some(0.0));
        assert!(session.graph.is_port_connected(b, "A"));
    }
}
