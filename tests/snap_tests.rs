//! Integrationstests für Snap-and-Connect und Drag über den Controller.

use approx::assert_abs_diff_eq;
use glam::DVec2;
use track_plan_core::core::geometry;
use track_plan_core::{
    CommandOutcome, EdgeId, PortRef, TrackCatalog, TrackPlanCommand, TrackPlanController,
    TrackPlanSession,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn add(
    controller: &mut TrackPlanController,
    session: &mut TrackPlanSession,
    template_id: &str,
    position: DVec2,
    rotation_deg: f64,
) -> EdgeId {
    let outcome = controller.handle_command(
        session,
        TrackPlanCommand::AddEdge {
            template_id: template_id.to_owned(),
            position,
            rotation_deg,
        },
    );
    match outcome {
        CommandOutcome::EdgeAdded(Some(id)) => id,
        other => panic!("Unerwartetes Ergebnis für AddEdge: {other:?}"),
    }
}

#[test]
fn test_gerades_gleis_rastet_erst_innerhalb_der_toleranz_ein() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let a = add(&mut controller, &mut session, "G231", DVec2::ZERO, 0.0);
    let b = add(&mut controller, &mut session, "G231", DVec2::new(300.0, 0.0), 180.0);

    // B-Ports liegen 69 mm auseinander
    let outcome = controller.handle_command(&mut session, TrackPlanCommand::TrySnapAndConnect { edge: b });
    assert_eq!(outcome, CommandOutcome::Snapped(None));
    assert!(!outcome.changed());

    controller.handle_command(
        &mut session,
        TrackPlanCommand::MoveEdge {
            edge: b,
            position: DVec2::new(231.0, 0.0),
        },
    );
    let outcome = controller.handle_command(&mut session, TrackPlanCommand::TrySnapAndConnect { edge: b });
    let CommandOutcome::Snapped(Some(candidate)) = outcome else {
        panic!("Einrasten erwartet, erhalten: {outcome:?}");
    };
    assert_eq!(candidate.moving, PortRef::new(b, "B"));
    assert_eq!(candidate.target, PortRef::new(a, "B"));

    let edge = session.graph.edge(b).expect("Gleis b existiert");
    assert_abs_diff_eq!(edge.position.x, 231.0, epsilon = 1e-9);
    assert_abs_diff_eq!(edge.position.y, 0.0, epsilon = 1e-9);
    assert!(geometry::angle_deviation(edge.rotation_deg, 180.0) < 1e-9);
    assert_eq!(session.graph.connected_port(a, "B"), Some(PortRef::new(b, "B")));
    assert_eq!(session.node_count(), 1);
}

#[test]
fn test_kurve_wird_beim_einrasten_gedreht() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let straight = add(&mut controller, &mut session, "G231", DVec2::ZERO, 0.0);

    // Port A der Kurve liegt 10 mm neben Port B der Geraden, zeigt aber schräg
    let a_offset = session
        .catalog
        .template("R1")
        .and_then(|t| geometry::port_world_offset(&t.geometry, "A", 0.0))
        .expect("R1 hat Port A");
    let curve = add(
        &mut controller,
        &mut session,
        "R1",
        DVec2::new(125.5, 0.0) - a_offset,
        0.0,
    );

    let outcome = controller.handle_command(&mut session, TrackPlanCommand::TrySnapAndConnect { edge: curve });
    assert!(outcome.changed(), "Einrasten erwartet: {outcome:?}");

    let port_a = session.graph.port_world_position(curve, "A").expect("Port A");
    assert_abs_diff_eq!(port_a.x, 115.5, epsilon = 1e-6);
    assert_abs_diff_eq!(port_a.y, 0.0, epsilon = 1e-6);
    let facing = session.graph.port_facing_angle(curve, "A").expect("Port A");
    assert!(geometry::angle_deviation(facing, 180.0) < 1e-6);
    assert_eq!(session.graph.connected_port(straight, "B"), Some(PortRef::new(curve, "A")));
}

#[test]
fn test_drag_einer_gruppe_rastet_ohne_drehung_ein() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let a1 = add(&mut controller, &mut session, "G231", DVec2::ZERO, 0.0);
    let a2 = add(&mut controller, &mut session, "G231", DVec2::new(231.0, 0.0), 0.0);
    let target = add(&mut controller, &mut session, "G231", DVec2::new(480.0, 3.0), 0.0);
    controller.handle_command(
        &mut session,
        TrackPlanCommand::ConnectPorts {
            a_edge: a1,
            a_port: "B".into(),
            b_edge: a2,
            b_port: "A".into(),
        },
    );

    controller.handle_command(
        &mut session,
        TrackPlanCommand::BeginDrag {
            edge: a1,
            pointer: DVec2::ZERO,
        },
    );
    assert!(session.is_dragging());
    controller.handle_command(
        &mut session,
        TrackPlanCommand::UpdateDrag {
            pointer: DVec2::new(10.0, 2.0),
        },
    );
    let outcome = controller.handle_command(&mut session, TrackPlanCommand::ReleaseDrag);
    let CommandOutcome::Snapped(Some(candidate)) = outcome else {
        panic!("Gruppen-Snap erwartet, erhalten: {outcome:?}");
    };
    assert_eq!(candidate.moving, PortRef::new(a2, "B"));
    assert_eq!(candidate.target, PortRef::new(target, "A"));
    assert!(!session.is_dragging());

    for (id, x) in [(a1, 18.0), (a2, 249.0)] {
        let edge = session.graph.edge(id).expect("Gleis existiert");
        assert_abs_diff_eq!(edge.position.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(edge.position.y, 3.0, epsilon = 1e-9);
        assert_eq!(edge.rotation_deg, 0.0);
    }
    assert_eq!(session.node_count(), 2);
}

#[test]
fn test_weiche_mit_offenem_abzweig_liefert_genau_eine_warnung() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let switch = add(&mut controller, &mut session, "W10L", DVec2::ZERO, 0.0);
    let straight = add(&mut controller, &mut session, "G231", DVec2::new(240.0, 0.0), 0.0);

    let outcome = controller.handle_command(&mut session, TrackPlanCommand::TrySnapAndConnect { edge: straight });
    assert!(outcome.changed());

    let CommandOutcome::Violations(violations) =
        controller.handle_command(&mut session, TrackPlanCommand::Validate)
    else {
        panic!("Validate muss Befunde liefern");
    };
    assert_eq!(violations.len(), 1, "Befunde: {violations:?}");
    assert_eq!(violations[0].rule, "unterminated-diverging-route");
    assert_eq!(violations[0].edges, vec![switch]);

    // Mit Prellbock ist der Abzweig abgeschlossen
    controller.handle_command(
        &mut session,
        TrackPlanCommand::SetEndCap {
            edge: switch,
            port: "C".into(),
            capped: true,
        },
    );
    let outcome = controller.handle_command(&mut session, TrackPlanCommand::Validate);
    assert_eq!(outcome, CommandOutcome::Violations(Vec::new()));
}

#[test]
fn test_controller_protokolliert_commands_und_leert_plan() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    add(&mut controller, &mut session, "G119", DVec2::ZERO, 0.0);
    let outcome = controller.handle_command(
        &mut session,
        TrackPlanCommand::AddEdge {
            template_id: "UNBEKANNT".into(),
            position: DVec2::ZERO,
            rotation_deg: 0.0,
        },
    );
    assert_eq!(outcome, CommandOutcome::EdgeAdded(None));

    controller.handle_command(&mut session, TrackPlanCommand::Validate);
    controller.handle_command(&mut session, TrackPlanCommand::Clear);
    assert_eq!(session.edge_count(), 0);
    // Validate ist eine reine Abfrage und fehlt im Log
    assert_eq!(session.command_log.len(), 3);
    assert_eq!(session.command_log.commands().last(), Some(&TrackPlanCommand::Clear));

    let scene = controller.build_render_scene(&session);
    assert!(scene.edges.is_empty());
}

#[test]
fn test_abgespieltes_command_log_ergibt_denselben_plan() {
    init_logger();
    let mut controller = TrackPlanController::new();
    let mut session = TrackPlanSession::with_builtin_catalog();
    let a = add(&mut controller, &mut session, "G231", DVec2::ZERO, 0.0);
    let b = add(&mut controller, &mut session, "G231", DVec2::new(600.0, 40.0), 0.0);

    // b neben a ziehen und loslassen
    for command in [
        TrackPlanCommand::BeginDrag {
            edge: b,
            pointer: DVec2::new(600.0, 40.0),
        },
        TrackPlanCommand::UpdateDrag {
            pointer: DVec2::new(245.0, 5.0),
        },
        TrackPlanCommand::ReleaseDrag,
        TrackPlanCommand::SetEndCap {
            edge: b,
            port: "B".into(),
            capped: true,
        },
        TrackPlanCommand::SetFeedbackPoint {
            edge: a,
            feedback_point: Some(7),
        },
        TrackPlanCommand::Validate,
        TrackPlanCommand::RemoveEdge { edge: EdgeId(99) },
    ] {
        controller.handle_command(&mut session, command);
    }
    assert_eq!(session.graph.connected_port(a, "B"), Some(PortRef::new(b, "A")));

    let mut replayed = TrackPlanSession::with_builtin_catalog();
    let changed = controller.replay(&mut replayed, session.command_log.commands());
    assert_eq!(changed, 7);
    assert!(session.command_log.is_complete());
    assert_eq!(replayed.command_log.commands(), session.command_log.commands());
    assert_eq!(replayed.to_snapshot(), session.to_snapshot());
    assert!(!replayed.is_dragging());
}
