//! Verlauf der plan-verändernden Commands einer Session.
//!
//! Das Log ist die Grundlage für [`TrackPlanController::replay`]: Wird es in
//! eine Session mit demselben Ausgangsstand abgespielt, entsteht derselbe Plan.
//! Reine Abfragen wie `Validate` landen nicht im Log.
//!
//! [`TrackPlanController::replay`]: super::TrackPlanController::replay

use super::TrackPlanCommand;

/// Begrenzter Verlauf abspielbarer Commands.
#[derive(Debug, Default)]
pub struct CommandLog {
    commands: Vec<TrackPlanCommand>,
    /// Seit dem letzten `reset` verworfene Einträge
    dropped: usize,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Merkt sich einen Command, sofern er den Plan verändern kann.
    ///
    /// Bei Überlauf fällt die ältere Hälfte weg; das Log ist danach nicht
    /// mehr ab einem leeren Plan abspielbar (siehe [`Self::is_complete`]).
    pub fn record(&mut self, command: &TrackPlanCommand) {
        if !command.mutates_plan() {
            return;
        }
        if self.commands.len() >= Self::MAX_ENTRIES {
            let half = Self::MAX_ENTRIES / 2;
            self.commands.drain(..half);
            self.dropped += half;
            log::warn!("Command-Log übergelaufen, {} Einträge verworfen", self.dropped);
        }
        self.commands.push(command.clone());
    }

    /// Leert das Log, z.B. wenn ein Snapshot den Ausgangsstand ersetzt.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `true`, solange seit dem letzten `reset` nichts verworfen wurde.
    pub fn is_complete(&self) -> bool {
        self.dropped == 0
    }

    /// Abspielbare Commands in Ausführungsreihenfolge.
    pub fn commands(&self) -> &[TrackPlanCommand] {
        &self.commands
    }
}
