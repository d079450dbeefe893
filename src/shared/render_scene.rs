//! Read-Modell des Gleisplans als expliziter Übergabevertrag an den Renderer.
//!
//! Lebt im shared-Modul, da `app` es baut und der Editor es pro Frame abholt.

use crate::core::{EdgeId, PortId};
use glam::DVec2;

/// Ein Port, wie der Renderer ihn braucht.
#[derive(Debug, Clone, PartialEq)]
pub struct PortView {
    pub id: PortId,
    /// Weltposition in mm
    pub world_position: DVec2,
    /// Nach außen zeigende Richtung in Grad
    pub facing_deg: f64,
    /// Offen/verbunden für die Farbcodierung
    pub connected: bool,
    /// Port trägt einen Prellbock
    pub end_cap: bool,
}

/// Ein Gleisstück mit allen Ports.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub id: EdgeId,
    pub template_id: String,
    pub position: DVec2,
    pub rotation_deg: f64,
    pub feedback_point: Option<u32>,
    pub ports: Vec<PortView>,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPlanScene {
    /// Alle Gleisstücke, nach ID sortiert
    pub edges: Vec<EdgeView>,
    /// Gleise der laufenden Drag-Gruppe
    pub dragging: Vec<EdgeId>,
}

impl TrackPlanScene {
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Anzahl offener Ports (ohne Prellbock) im ganzen Plan.
    pub fn open_port_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| e.ports.iter())
            .filter(|p| !p.connected && !p.end_cap)
            .count()
    }
}
