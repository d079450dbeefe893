//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Optionen und das Render-Read-Modell, die zwischen `app` und dem
//! einbettenden Editor geteilt werden.

pub mod options;
mod render_scene;

pub use options::TrackPlanOptions;
pub use options::{SNAP_ANGLE_TOLERANCE_DEG, SNAP_DISTANCE_MM};
pub use render_scene::{EdgeView, PortView, TrackPlanScene};
