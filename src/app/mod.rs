//! Application-Layer: Session, Controller, Commands und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod render_scene;
/// Besitzender Kontext eines Gleisplans
///
/// Hält Graph, Katalog, Optionen und Drag-Zustand zusammen.
pub mod session;
pub mod snapshot;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::TrackPlanController;
pub use events::{CommandOutcome, TrackPlanCommand};
pub use render_scene::build as build_render_scene;
pub use session::{DragState, TrackPlanSession};
pub use snapshot::{EdgeRecord, LoadReport, TrackPlanSnapshot, SNAPSHOT_VERSION};
