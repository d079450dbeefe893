//! Use-Cases der Application-Layer-Orchestrierung.
//!
//! Aufgeteilt nach Operation:
//! - `editing`: Gleise platzieren, bewegen, drehen, löschen, attributieren
//! - `connecting`: Einrasten, Verbinden, Trennen
//! - `group`: Zusammenhängende Gruppen und Wege
//! - `drag`: Drag-Lifecycle mit Einrasten beim Loslassen
//! - `validation`: Strukturprüfung

pub mod connecting;
pub mod drag;
pub mod editing;
pub mod group;
pub mod validation;
