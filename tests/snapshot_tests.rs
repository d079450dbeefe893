//! Integrationstests für Snapshots und eigene Kataloge.

use std::sync::Arc;

use glam::DVec2;
use track_plan_core::app::use_cases::{connecting, editing, validation};
use track_plan_core::{
    MemoryCatalog, PortRef, TrackPlanOptions, TrackPlanSession, TrackPlanSnapshot,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const CUSTOM_CATALOG: &str = r#"
[[template]]
id = "S100"
kind = "straight"
length_mm = 100.0

[[template]]
id = "K45"
kind = "curve"
radius_mm = 250.0
angle_deg = 45.0

[[template]]
id = "KAPUTT"
kind = "curve"
radius_mm = -1.0
angle_deg = 45.0
"#;

#[test]
fn test_snapshot_uebersteht_json_und_stellt_topologie_her() {
    init_logger();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let a = editing::add_edge(&mut session, "G231", DVec2::ZERO, 0.0).expect("G231");
    let w = editing::add_edge(&mut session, "WR", DVec2::new(235.0, 2.0), 0.0).expect("WR");
    let c = editing::add_edge(&mut session, "R2", DVec2::new(900.0, 900.0), 45.0).expect("R2");
    assert!(connecting::try_snap_and_connect(&mut session, w).is_some());
    assert!(editing::set_end_cap(&mut session, w, "C", true));
    assert!(editing::set_feedback_point(&mut session, c, Some(3)));

    let snapshot = session.to_snapshot();
    let json = serde_json::to_string_pretty(&snapshot).expect("Serialisierung");
    let parsed: TrackPlanSnapshot = serde_json::from_str(&json).expect("Deserialisierung");
    assert_eq!(parsed.edges.len(), snapshot.edges.len());
    assert_eq!(parsed.edges[1].connections, snapshot.edges[1].connections);

    let mut restored = TrackPlanSession::with_builtin_catalog();
    let report = restored.load_snapshot(&parsed);
    assert_eq!(report.edges_loaded, 3);
    assert_eq!(report.connections_restored, 1);
    assert_eq!(restored.node_count(), 1);
    assert_eq!(restored.graph.connected_port(a, "B"), Some(PortRef::new(w, "A")));
    assert_eq!(
        validation::validate(&restored),
        validation::validate(&session),
        "Befunde müssen nach dem Laden gleich bleiben"
    );
    assert_eq!(restored.to_snapshot(), parsed);
}

#[test]
fn test_laden_ersetzt_bestehenden_plan() {
    init_logger();
    let mut session = TrackPlanSession::with_builtin_catalog();
    editing::add_edge(&mut session, "G62", DVec2::ZERO, 0.0).expect("G62");
    editing::add_edge(&mut session, "G62", DVec2::new(62.0, 0.0), 0.0).expect("G62");

    let empty = TrackPlanSnapshot {
        version: track_plan_core::app::SNAPSHOT_VERSION,
        edges: Vec::new(),
    };
    let report = session.load_snapshot(&empty);
    assert_eq!(report.edges_loaded, 0);
    assert_eq!(session.edge_count(), 0);
    assert_eq!(session.node_count(), 0);
}

#[test]
fn test_eigener_katalog_aus_toml() {
    init_logger();
    let catalog = MemoryCatalog::from_toml_str(CUSTOM_CATALOG).expect("TOML gültig");
    assert_eq!(catalog.ids(), vec!["K45", "S100"]);

    let mut session = TrackPlanSession::new(Arc::new(catalog), TrackPlanOptions::default());
    assert!(editing::add_edge(&mut session, "S100", DVec2::ZERO, 0.0).is_some());
    assert!(editing::add_edge(&mut session, "K45", DVec2::new(400.0, 0.0), 0.0).is_some());
    assert!(editing::add_edge(&mut session, "G231", DVec2::ZERO, 0.0).is_none());
    assert!(editing::add_edge(&mut session, "KAPUTT", DVec2::ZERO, 0.0).is_none());
    assert_eq!(session.edge_count(), 2);
}
