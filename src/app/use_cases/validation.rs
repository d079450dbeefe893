//! Use-Case: Strukturprüfung des ganzen Plans.

use crate::app::TrackPlanSession;
use crate::core::{Severity, ValidationContext, Violation};

/// Führt alle Regeln des Session-Validators aus.
pub fn validate(session: &TrackPlanSession) -> Vec<Violation> {
    let ctx = ValidationContext {
        graph: &session.graph,
        alignment: session.options.alignment(),
    };
    let violations = session.validator.validate(&ctx);
    let errors = violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    log::info!(
        "Validierung: {} Befunde, davon {} Fehler",
        violations.len(),
        errors
    );
    violations
}
