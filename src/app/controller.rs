//! Application Controller für zentrale Command-Verarbeitung.

use super::use_cases;
use super::{CommandOutcome, TrackPlanCommand, TrackPlanSession};
use crate::shared::TrackPlanScene;

/// Orchestriert Editor-Commands und Use-Cases auf der Session.
#[derive(Default)]
pub struct TrackPlanController;

impl TrackPlanController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt einen Command auf der Session aus und protokolliert ihn.
    pub fn handle_command(
        &mut self,
        session: &mut TrackPlanSession,
        command: TrackPlanCommand,
    ) -> CommandOutcome {
        session.command_log.record(&command);
        use use_cases::{connecting, drag, editing, group, validation};

        match command {
            // === Platzierung ===
            TrackPlanCommand::AddEdge {
                template_id,
                position,
                rotation_deg,
            } => CommandOutcome::EdgeAdded(editing::add_edge(
                session,
                &template_id,
                position,
                rotation_deg,
            )),
            TrackPlanCommand::MoveEdge { edge, position } => {
                CommandOutcome::Applied(editing::move_edge(session, edge, position))
            }
            TrackPlanCommand::RotateEdge { edge, rotation_deg } => {
                CommandOutcome::Applied(editing::rotate_edge(session, edge, rotation_deg))
            }
            TrackPlanCommand::RemoveEdge { edge } => {
                CommandOutcome::Applied(editing::remove_edge(session, edge))
            }
            TrackPlanCommand::SetFeedbackPoint {
                edge,
                feedback_point,
            } => CommandOutcome::Applied(editing::set_feedback_point(session, edge, feedback_point)),
            TrackPlanCommand::SetEndCap { edge, port, capped } => {
                CommandOutcome::Applied(editing::set_end_cap(session, edge, &port, capped))
            }

            // === Verbindungen ===
            TrackPlanCommand::TrySnapAndConnect { edge } => {
                CommandOutcome::Snapped(connecting::try_snap_and_connect(session, edge))
            }
            TrackPlanCommand::ConnectPorts {
                a_edge,
                a_port,
                b_edge,
                b_port,
            } => CommandOutcome::Applied(connecting::connect_ports(
                session, a_edge, &a_port, b_edge, &b_port,
            )),
            TrackPlanCommand::Disconnect { edge, port } => {
                CommandOutcome::Applied(connecting::disconnect(session, edge, &port))
            }
            TrackPlanCommand::DisconnectAll { edge } => {
                CommandOutcome::Count(connecting::disconnect_all(session, edge))
            }

            // === Gruppen & Drag ===
            TrackPlanCommand::MoveGroup { edge, delta } => {
                CommandOutcome::Count(group::move_group(session, edge, delta))
            }
            TrackPlanCommand::BeginDrag { edge, pointer } => {
                CommandOutcome::Applied(drag::begin_drag(session, edge, pointer))
            }
            TrackPlanCommand::UpdateDrag { pointer } => {
                CommandOutcome::Applied(drag::update_drag(session, pointer))
            }
            TrackPlanCommand::ReleaseDrag => CommandOutcome::Snapped(drag::release_drag(session)),
            TrackPlanCommand::CancelDrag => CommandOutcome::Applied(drag::cancel_drag(session)),

            // === Plan ===
            TrackPlanCommand::Validate => CommandOutcome::Violations(validation::validate(session)),
            TrackPlanCommand::Clear => {
                session.clear();
                CommandOutcome::Applied(true)
            }
        }
    }

    /// Spielt Commands der Reihe nach auf der Session ab, z.B. das Log einer
    /// anderen Session mit demselben Ausgangsstand.
    ///
    /// Gibt die Anzahl der Commands zurück, die den Plan verändert haben.
    pub fn replay<'a, I>(&mut self, session: &mut TrackPlanSession, commands: I) -> usize
    where
        I: IntoIterator<Item = &'a TrackPlanCommand>,
    {
        let (mut total, mut changed) = (0, 0);
        for command in commands {
            total += 1;
            if self.handle_command(session, command.clone()).changed() {
                changed += 1;
            }
        }
        log::info!("{} Commands abgespielt, {} mit Änderung", total, changed);
        changed
    }

    /// Baut das Read-Modell für den aktuellen Frame.
    pub fn build_render_scene(&self, session: &TrackPlanSession) -> TrackPlanScene {
        super::render_scene::build(session)
    }
}
