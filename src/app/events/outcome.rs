use crate::core::{EdgeId, SnapCandidate, Violation};

/// Ergebnis eines ausgeführten Commands.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Neues Gleis (None = Vorlage unbekannt)
    EdgeAdded(Option<EdgeId>),
    /// Command hat etwas verändert (`false` = veraltete ID o.ä., nichts passiert)
    Applied(bool),
    /// Anzahl betroffener Gleise bzw. Ports
    Count(usize),
    /// Ergebnis eines Einrast-Versuchs
    Snapped(Option<SnapCandidate>),
    /// Befunde der Strukturprüfung
    Violations(Vec<Violation>),
}

impl CommandOutcome {
    /// `true`, wenn der Command den Plan verändert hat.
    pub fn changed(&self) -> bool {
        match self {
            CommandOutcome::EdgeAdded(id) => id.is_some(),
            CommandOutcome::Applied(applied) => *applied,
            CommandOutcome::Count(n) => *n > 0,
            CommandOutcome::Snapped(result) => result.is_some(),
            CommandOutcome::Violations(_) => false,
        }
    }
}
