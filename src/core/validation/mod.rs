//! Strukturprüfung des Gleisgraphen.
//!
//! Jede Regel liest den Graphen und hängt null oder mehr [`Violation`]s an.
//! Regeln mutieren nie; neue Regeln werden über [`ConstraintValidator::push_rule`]
//! ergänzt, ohne bestehende anzufassen.

mod rules;

pub use rules::{
    DanglingEndpointRule, DuplicateFeedbackAddressRule, MisalignedConnectionRule,
    OverConnectedNodeRule, UnterminatedDivergingRouteRule,
};

use super::{EdgeId, NodeId, TrackGraph};

/// Schwere eines Befunds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Ein Befund einer Regel.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Regel-ID, z.B. `over-connected-node`
    pub rule: &'static str,
    pub severity: Severity,
    /// Lesbare Beschreibung für die Statuszeile
    pub message: String,
    pub edges: Vec<EdgeId>,
    pub nodes: Vec<NodeId>,
}

/// Toleranzen der geometrischen Prüfung verbundener Ports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTolerance {
    pub distance_mm: f64,
    pub angle_deg: f64,
}

/// Eingabe für alle Regeln eines Laufs.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub graph: &'a TrackGraph,
    pub alignment: AlignmentTolerance,
}

/// Eine unabhängige, reine Prüfregel.
pub trait ConstraintRule {
    /// Stabile Regel-ID
    fn id(&self) -> &'static str;

    /// Prüft den Graphen und hängt Befunde an `out` an.
    fn check(&self, ctx: &ValidationContext<'_>, out: &mut Vec<Violation>);
}

/// Führt eine Liste von Regeln in fester Reihenfolge aus.
#[derive(Default)]
pub struct ConstraintValidator {
    rules: Vec<Box<dyn ConstraintRule>>,
}

impl ConstraintValidator {
    /// Validator ohne Regeln.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator mit allen Standardregeln.
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.push_rule(Box::new(UnterminatedDivergingRouteRule));
        validator.push_rule(Box::new(OverConnectedNodeRule));
        validator.push_rule(Box::new(DuplicateFeedbackAddressRule));
        validator.push_rule(Box::new(DanglingEndpointRule));
        validator.push_rule(Box::new(MisalignedConnectionRule));
        validator
    }

    /// Hängt eine weitere Regel an.
    pub fn push_rule(&mut self, rule: Box<dyn ConstraintRule>) {
        self.rules.push(rule);
    }

    /// IDs aller Regeln in Ausführungsreihenfolge.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Prüft den ganzen Graphen. Befunde sind nach Regel, dann erstem Gleis sortiert.
    pub fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut all = Vec::new();
        for rule in &self.rules {
            let mut found = Vec::new();
            rule.check(ctx, &mut found);
            found.sort_by_key(|v| (v.edges.first().copied(), v.nodes.first().copied()));
            all.extend(found);
        }
        log::debug!("Validierung: {} Befunde aus {} Regeln", all.len(), self.rules.len());
        all
    }
}
