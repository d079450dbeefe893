//! Core-Domänentypen: Gleisgraph, Geometrie, Katalog, Snap und Validierung.

pub mod catalog;
/// Verbindungs-Service (`try_connect`, `disconnect`, ...) als `impl TrackGraph`
pub mod connection;
pub mod geometry;
/// Zusammenhangskomponenten, Gruppenverschiebung und kürzeste Wege
pub mod group;
pub mod ids;
pub mod snap;
pub mod spatial;
pub mod track_graph;
pub mod validation;

pub use catalog::{
    Hand, MemoryCatalog, TemplateError, TemplateRecord, TrackCatalog, TrackGeometry, TrackKind,
    TrackTemplate,
};
pub use connection::SIMPLE_JUNCTION_OCCUPANTS;
pub use ids::{EdgeId, NodeId, PortId, PortRef};
pub use snap::{SnapCandidate, SnapSettings};
pub use spatial::{PortIndex, PortMatch};
pub use track_graph::{Endpoint, TrackEdge, TrackGraph, TrackNode};
pub use validation::{
    AlignmentTolerance, ConstraintRule, ConstraintValidator, Severity, ValidationContext, Violation,
};
