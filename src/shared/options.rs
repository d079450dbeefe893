//! Zentrale Konfiguration für den Gleisplan-Kern.
//!
//! `TrackPlanOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::{AlignmentTolerance, SnapSettings};

// ── Snap ────────────────────────────────────────────────────────────

/// Snap-Toleranz (mm): Ports rasten nur bei echt kleinerem Abstand ein.
pub const SNAP_DISTANCE_MM: f64 = 30.0;
/// Erlaubte Richtungsabweichung beim Einrasten starrer Gruppen (Grad).
pub const SNAP_ANGLE_TOLERANCE_DEG: f64 = 5.0;

// ── Validierung ─────────────────────────────────────────────────────

/// Maximaler Versatz verbundener Ports (mm).
pub const ALIGNMENT_TOLERANCE_MM: f64 = 0.5;
/// Maximale Abweichung verbundener Ports von "gegenüberliegend" (Grad).
pub const ALIGNMENT_ANGLE_TOLERANCE_DEG: f64 = 5.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `track_plan_core.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackPlanOptions {
    // ── Snap ────────────────────────────────────────────────────
    /// Snap-Toleranz in mm
    pub snap_distance_mm: f64,
    /// Winkeltoleranz für Gruppen-Snap in Grad
    #[serde(default = "default_snap_angle_tolerance_deg")]
    pub snap_angle_tolerance_deg: f64,

    // ── Validierung ─────────────────────────────────────────────
    /// Maximaler Versatz verbundener Ports in mm
    #[serde(default = "default_alignment_tolerance_mm")]
    pub alignment_tolerance_mm: f64,
    /// Maximale Winkelabweichung verbundener Ports in Grad
    #[serde(default = "default_alignment_angle_tolerance_deg")]
    pub alignment_angle_tolerance_deg: f64,
}

impl Default for TrackPlanOptions {
    fn default() -> Self {
        Self {
            snap_distance_mm: SNAP_DISTANCE_MM,
            snap_angle_tolerance_deg: SNAP_ANGLE_TOLERANCE_DEG,
            alignment_tolerance_mm: ALIGNMENT_TOLERANCE_MM,
            alignment_angle_tolerance_deg: ALIGNMENT_ANGLE_TOLERANCE_DEG,
        }
    }
}

/// Serde-Default für `snap_angle_tolerance_deg` (Abwärtskompatibilität).
fn default_snap_angle_tolerance_deg() -> f64 {
    SNAP_ANGLE_TOLERANCE_DEG
}

fn default_alignment_tolerance_mm() -> f64 {
    ALIGNMENT_TOLERANCE_MM
}

fn default_alignment_angle_tolerance_deg() -> f64 {
    ALIGNMENT_ANGLE_TOLERANCE_DEG
}

impl TrackPlanOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("track_plan_core"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("track_plan_core.toml")
    }

    /// Snap-Toleranzen für den Snap-Engine.
    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            distance_mm: self.snap_distance_mm,
            angle_tolerance_deg: self.snap_angle_tolerance_deg,
        }
    }

    /// Toleranzen für die Prüfung verbundener Ports.
    pub fn alignment(&self) -> AlignmentTolerance {
        AlignmentTolerance {
            distance_mm: self.alignment_tolerance_mm,
            angle_deg: self.alignment_angle_tolerance_deg,
        }
    }
}
