//! Use-Case: Drag-Lifecycle eines Gleises samt verbundener Gruppe.
//!
//! Während des Ziehens werden nur Positionen verändert. Erst `release_drag`
//! versucht einzurasten; `cancel_drag` stellt die Startpositionen wieder her.

use glam::DVec2;

use crate::app::{DragState, TrackPlanSession};
use crate::core::{snap, EdgeId, SnapCandidate};

/// Startet einen Drag am Gleis `edge`. Ein laufender Drag wird vorher abgebrochen.
pub fn begin_drag(session: &mut TrackPlanSession, edge: EdgeId, pointer: DVec2) -> bool {
    if !session.graph.contains_edge(edge) {
        log::debug!("Drag ignoriert: Gleis {} existiert nicht", edge);
        return false;
    }
    if session.drag.is_some() {
        cancel_drag(session);
    }

    let group = session.graph.connected_group(edge);
    let start_positions = group
        .iter()
        .filter_map(|id| session.graph.edge(*id).map(|e| (*id, e.position)))
        .collect();

    log::debug!("Drag gestartet an Gleis {} ({} Gleise)", edge, group.len());
    session.drag = Some(DragState {
        anchor: edge,
        group,
        start_pointer: pointer,
        start_positions,
    });
    true
}

/// Zieht die Gruppe zur neuen Zeigerposition (reine Verschiebung).
pub fn update_drag(session: &mut TrackPlanSession, pointer: DVec2) -> bool {
    let Some(drag) = session.drag.as_ref() else {
        return false;
    };
    let delta = pointer - drag.start_pointer;
    for (id, start) in &drag.start_positions {
        session.graph.set_edge_position(*id, *start + delta);
    }
    true
}

/// Vorschau: wohin würde das Loslassen einrasten?
pub fn drag_snap_preview(session: &TrackPlanSession) -> Option<SnapCandidate> {
    let drag = session.drag.as_ref()?;
    let settings = session.options.snap_settings();
    if drag.group.len() == 1 {
        snap::find_snap_target(&session.graph, drag.anchor, &settings)
    } else {
        snap::group_snap_candidates(&session.graph, &drag.group, &settings)
            .into_iter()
            .next()
    }
}

/// Beendet den Drag und versucht genau eine Verbindung.
///
/// Einzelne Gleise dürfen dabei gedreht werden, Gruppen werden nur verschoben.
pub fn release_drag(session: &mut TrackPlanSession) -> Option<SnapCandidate> {
    let drag = session.drag.take()?;
    let settings = session.options.snap_settings();
    let result = if drag.group.len() == 1 {
        snap::try_snap_and_connect(&mut session.graph, drag.anchor, &settings)
    } else {
        snap::snap_group(&mut session.graph, &drag.group, &settings)
    };
    if result.is_none() {
        log::debug!("Drag von Gleis {} ohne Einrasten beendet", drag.anchor);
    }
    result
}

/// Bricht den Drag ab und stellt alle Startpositionen wieder her.
pub fn cancel_drag(session: &mut TrackPlanSession) -> bool {
    let Some(drag) = session.drag.take() else {
        return false;
    };
    for (id, start) in &drag.start_positions {
        session.graph.set_edge_position(*id, *start);
    }
    log::debug!("Drag von Gleis {} abgebrochen", drag.anchor);
    true
}
