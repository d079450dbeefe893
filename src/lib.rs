//! Gleisplan-Kern für Modellbahn-Editoren.
//! Topologie, Geometrie, Einrasten und Validierung als Library, ohne UI.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    CommandOutcome, DragState, TrackPlanCommand, TrackPlanController, TrackPlanSession,
    TrackPlanSnapshot,
};
pub use core::{
    ConstraintValidator, EdgeId, MemoryCatalog, NodeId, PortId, PortRef, SnapCandidate,
    TrackCatalog, TrackEdge, TrackGraph, TrackNode, TrackTemplate, Violation,
};
pub use shared::{TrackPlanOptions, TrackPlanScene};
