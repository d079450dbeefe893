//! Besitzender Kontext eines geöffneten Gleisplans.

use std::sync::Arc;

use glam::DVec2;
use indexmap::IndexSet;

use super::CommandLog;
use crate::core::{ConstraintValidator, EdgeId, MemoryCatalog, TrackCatalog, TrackGraph};
use crate::shared::TrackPlanOptions;

/// Zustand eines laufenden Drags. Verbindungen werden erst beim Loslassen angefasst.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Gleis, an dem gezogen wird
    pub anchor: EdgeId,
    /// Mitgezogene Gruppe inklusive Anker, BFS-Reihenfolge
    pub group: IndexSet<EdgeId>,
    /// Zeigerposition beim Start
    pub start_pointer: DVec2,
    /// Positionen vor dem Drag, für Abbruch
    pub start_positions: Vec<(EdgeId, DVec2)>,
}

/// Einziger Besitzer von Graph, Katalog-Zugriff, Optionen und Drag-Zustand.
///
/// Wird per Referenz an Use-Cases und Controller gereicht, nie global gehalten.
pub struct TrackPlanSession {
    /// Der Gleisgraph
    pub graph: TrackGraph,
    /// Read-only Vorlagen
    pub catalog: Arc<dyn TrackCatalog>,
    /// Laufzeit-Optionen (Toleranzen)
    pub options: TrackPlanOptions,
    /// Laufender Drag (None = kein Drag)
    pub drag: Option<DragState>,
    /// Regeln für `validate`
    pub validator: ConstraintValidator,
    /// Abspielbarer Verlauf plan-verändernder Commands
    pub command_log: CommandLog,
}

impl TrackPlanSession {
    /// Erstellt eine leere Session.
    pub fn new(catalog: Arc<dyn TrackCatalog>, options: TrackPlanOptions) -> Self {
        Self {
            graph: TrackGraph::new(),
            catalog,
            options,
            drag: None,
            validator: ConstraintValidator::with_default_rules(),
            command_log: CommandLog::new(),
        }
    }

    /// Session mit eingebautem Piko-A-Katalog und Standard-Optionen.
    pub fn with_builtin_catalog() -> Self {
        Self::new(Arc::new(MemoryCatalog::piko_a()), TrackPlanOptions::default())
    }

    /// Verwirft alle Gleise, Knoten und einen laufenden Drag.
    pub fn clear(&mut self) {
        let edges = self.graph.edge_count();
        self.graph.clear();
        self.drag = None;
        log::info!("Gleisplan geleert ({} Gleise entfernt)", edges);
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
