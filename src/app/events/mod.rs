//! Command-Enum und Ergebnis-Typen für den Command-Datenfluss.

mod command;
mod outcome;

pub use command::TrackPlanCommand;
pub use outcome::CommandOutcome;
