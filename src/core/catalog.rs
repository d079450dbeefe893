//! Gleis-Katalog: unveränderliche Geometrie-Vorlagen für Gleisstücke.
//!
//! Der Kern liest Vorlagen nur über den Trait [`TrackCatalog`]. Mit
//! [`MemoryCatalog`] liegt eine HashMap-basierte Umsetzung bei, die entweder
//! das eingebaute Piko-A-Sortiment enthält oder aus TOML geladen wird.

use super::PortId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only Lookup von Vorlagen anhand ihrer Template-ID.
pub trait TrackCatalog {
    /// Liefert die Vorlage zu `id` oder `None`, falls unbekannt.
    fn template(&self, id: &str) -> Option<&TrackTemplate>;
}

/// Abzweigrichtung einer Weiche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Leitet die Richtung aus der Template-ID ab: ein abschließendes "L" bedeutet links.
    pub fn from_template_id(id: &str) -> Self {
        if id.ends_with('L') {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    /// Vorzeichen des Abzweigwinkels (+1 links, -1 rechts).
    pub fn sign(self) -> f64 {
        match self {
            Hand::Left => 1.0,
            Hand::Right => -1.0,
        }
    }
}

/// Grundform eines Gleisstücks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Straight,
    Curve,
    Switch,
}

/// Geometrie-Parameter je Grundform (Längen in mm, Winkel in Grad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackGeometry {
    Straight {
        length_mm: f64,
    },
    /// Positiver Winkel = Linksbogen
    Curve {
        radius_mm: f64,
        angle_deg: f64,
    },
    Switch {
        length_mm: f64,
        diverge_angle_deg: f64,
        hand: Hand,
    },
}

impl TrackGeometry {
    pub fn kind(&self) -> TrackKind {
        match self {
            TrackGeometry::Straight { .. } => TrackKind::Straight,
            TrackGeometry::Curve { .. } => TrackKind::Curve,
            TrackGeometry::Switch { .. } => TrackKind::Switch,
        }
    }
}

/// Eine Katalog-Vorlage: Port-Liste plus Geometrie.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackTemplate {
    pub id: String,
    pub ports: Vec<PortId>,
    pub geometry: TrackGeometry,
}

impl TrackTemplate {
    /// Gerades Gleis mit den Ports A und B.
    pub fn straight(id: &str, length_mm: f64) -> Self {
        Self {
            id: id.to_owned(),
            ports: vec![PortId::a(), PortId::b()],
            geometry: TrackGeometry::Straight { length_mm },
        }
    }

    /// Bogen mit den Ports A und B.
    pub fn curve(id: &str, radius_mm: f64, angle_deg: f64) -> Self {
        Self {
            id: id.to_owned(),
            ports: vec![PortId::a(), PortId::b()],
            geometry: TrackGeometry::Curve {
                radius_mm,
                angle_deg,
            },
        }
    }

    /// Weiche mit Stammgleis A→B und Abzweig C. Richtung folgt der ID.
    pub fn switch(id: &str, length_mm: f64, diverge_angle_deg: f64) -> Self {
        Self {
            id: id.to_owned(),
            ports: vec![PortId::a(), PortId::b(), PortId::c()],
            geometry: TrackGeometry::Switch {
                length_mm,
                diverge_angle_deg,
                hand: Hand::from_template_id(id),
            },
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.geometry.kind()
    }

    /// Länge bei Geraden und Weichen.
    pub fn length_mm(&self) -> Option<f64> {
        match self.geometry {
            TrackGeometry::Straight { length_mm } | TrackGeometry::Switch { length_mm, .. } => {
                Some(length_mm)
            }
            TrackGeometry::Curve { .. } => None,
        }
    }

    /// Radius bei Bögen.
    pub fn radius_mm(&self) -> Option<f64> {
        match self.geometry {
            TrackGeometry::Curve { radius_mm, .. } => Some(radius_mm),
            _ => None,
        }
    }

    /// Bogenwinkel bzw. Abzweigwinkel.
    pub fn angle_deg(&self) -> Option<f64> {
        match self.geometry {
            TrackGeometry::Curve { angle_deg, .. } => Some(angle_deg),
            TrackGeometry::Switch {
                diverge_angle_deg, ..
            } => Some(diverge_angle_deg),
            TrackGeometry::Straight { .. } => None,
        }
    }

    pub fn has_port(&self, port: &str) -> bool {
        self.ports.iter().any(|p| p.as_str() == port)
    }
}

// ── Externe Darstellung ─────────────────────────────────────────────

/// Fehler beim Umwandeln eines Katalog-Eintrags in eine Vorlage.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TemplateError {
    #[error("Vorlage ohne ID")]
    MissingId,

    #[error("Vorlage {id}: Parameter '{field}' fehlt")]
    MissingParameter { id: String, field: &'static str },

    #[error("Vorlage {id}: Parameter '{field}' muss positiv sein, ist {value}")]
    NonPositive {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Vorlage {id}: Ports {found:?} passen nicht zu {kind:?} (erwartet {expected:?})")]
    PortMismatch {
        id: String,
        kind: TrackKind,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Flache, serialisierbare Form eines Katalog-Eintrags (`[[template]]` in TOML).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateRecord {
    pub id: String,
    pub kind: TrackKind,
    /// Optional; ohne Angabe gelten die Standard-Ports der Grundform
    #[serde(default)]
    pub ports: Option<Vec<String>>,
    #[serde(default)]
    pub length_mm: Option<f64>,
    #[serde(default)]
    pub radius_mm: Option<f64>,
    #[serde(default)]
    pub angle_deg: Option<f64>,
    #[serde(default)]
    pub hand: Option<Hand>,
}

fn default_ports(kind: TrackKind) -> &'static [&'static str] {
    match kind {
        TrackKind::Straight | TrackKind::Curve => &["A", "B"],
        TrackKind::Switch => &["A", "B", "C"],
    }
}

fn required(id: &str, field: &'static str, value: Option<f64>) -> Result<f64, TemplateError> {
    let value = value.ok_or_else(|| TemplateError::MissingParameter {
        id: id.to_owned(),
        field,
    })?;
    if value.is_nan() || value <= 0.0 {
        return Err(TemplateError::NonPositive {
            id: id.to_owned(),
            field,
            value,
        });
    }
    Ok(value)
}

impl TryFrom<TemplateRecord> for TrackTemplate {
    type Error = TemplateError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim().to_owned();
        if id.is_empty() {
            return Err(TemplateError::MissingId);
        }

        let expected = default_ports(record.kind);
        if let Some(found) = &record.ports {
            let mut sorted: Vec<&str> = found.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            if sorted != expected {
                return Err(TemplateError::PortMismatch {
                    id,
                    kind: record.kind,
                    expected: expected.iter().map(|p| (*p).to_owned()).collect(),
                    found: found.clone(),
                });
            }
        }

        let geometry = match record.kind {
            TrackKind::Straight => TrackGeometry::Straight {
                length_mm: required(&id, "length_mm", record.length_mm)?,
            },
            TrackKind::Curve => {
                let radius_mm = required(&id, "radius_mm", record.radius_mm)?;
                let angle_deg = record.angle_deg.ok_or_else(|| TemplateError::MissingParameter {
                    id: id.clone(),
                    field: "angle_deg",
                })?;
                // Rechtsbögen sind negativ, nur 0 ist unsinnig
                if angle_deg == 0.0 || !angle_deg.is_finite() {
                    return Err(TemplateError::NonPositive {
                        id,
                        field: "angle_deg",
                        value: angle_deg,
                    });
                }
                TrackGeometry::Curve {
                    radius_mm,
                    angle_deg,
                }
            }
            TrackKind::Switch => TrackGeometry::Switch {
                length_mm: required(&id, "length_mm", record.length_mm)?,
                diverge_angle_deg: required(&id, "angle_deg", record.angle_deg)?,
                hand: record.hand.unwrap_or_else(|| Hand::from_template_id(&id)),
            },
        };

        Ok(TrackTemplate {
            ports: expected.iter().map(|p| PortId::from(*p)).collect(),
            id,
            geometry,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "template")]
    templates: Vec<TemplateRecord>,
}

// ── In-Memory-Katalog ───────────────────────────────────────────────

/// HashMap-basierter Katalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    templates: HashMap<String, TrackTemplate>,
}

impl MemoryCatalog {
    /// Erstellt einen leeren Katalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Eingebautes Piko-A-Grundsortiment.
    pub fn piko_a() -> Self {
        let mut catalog = Self::new();
        for template in [
            TrackTemplate::straight("G231", 231.0),
            TrackTemplate::straight("G119", 119.0),
            TrackTemplate::straight("G62", 61.88),
            TrackTemplate::straight("G239", 239.07),
            TrackTemplate::straight("G940", 940.0),
            TrackTemplate::curve("R1", 360.0, 30.0),
            TrackTemplate::curve("R2", 421.88, 30.0),
            TrackTemplate::curve("R3", 483.75, 30.0),
            TrackTemplate::curve("R9", 907.97, 15.0),
            TrackTemplate::switch("WL", 239.07, 15.0),
            TrackTemplate::switch("WR", 239.07, 15.0),
            TrackTemplate::switch("W10L", 231.0, 15.0),
            TrackTemplate::switch("W10R", 231.0, 15.0),
        ] {
            catalog.insert(template);
        }
        catalog
    }

    /// Fügt eine Vorlage hinzu bzw. ersetzt eine gleichnamige.
    pub fn insert(&mut self, template: TrackTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Übernimmt gültige Einträge; fehlerhafte werden geloggt und übersprungen.
    ///
    /// Gibt die Anzahl übernommener Vorlagen zurück.
    pub fn extend_from_records(&mut self, records: impl IntoIterator<Item = TemplateRecord>) -> usize {
        let mut accepted = 0;
        for record in records {
            match TrackTemplate::try_from(record) {
                Ok(template) => {
                    self.insert(template);
                    accepted += 1;
                }
                Err(e) => log::warn!("Katalog-Eintrag übersprungen: {}", e),
            }
        }
        accepted
    }

    /// Parst `[[template]]`-Tabellen aus einem TOML-String.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::new();
        let total = file.templates.len();
        let accepted = catalog.extend_from_records(file.templates);
        log::info!("Katalog: {} von {} Vorlagen geladen", accepted, total);
        Ok(catalog)
    }

    /// Lädt einen Katalog aus einer TOML-Datei.
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Alle Template-IDs, sortiert.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl TrackCatalog for MemoryCatalog {
    fn template(&self, id: &str) -> Option<&TrackTemplate> {
        self.templates.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piko_a_enthaelt_weichen_mit_richtung() {
        let catalog = MemoryCatalog::piko_a();
        let w10l = catalog.template("W10L").expect("W10L vorhanden");
        assert_eq!(w10l.kind(), TrackKind::Switch);
        assert_eq!(w10l.ports.len(), 3);
        assert!(matches!(
            w10l.geometry,
            TrackGeometry::Switch {
                hand: Hand::Left,
                ..
            }
        ));
        let wr = catalog.template("WR").expect("WR vorhanden");
        assert!(matches!(
            wr.geometry,
            TrackGeometry::Switch {
                hand: Hand::Right,
                ..
            }
        ));
    }

    #[test]
    fn accessors_spiegeln_geometrie() {
        let catalog = MemoryCatalog::piko_a();
        let r2 = catalog.template("R2").expect("R2 vorhanden");
        assert_eq!(r2.radius_mm(), Some(421.88));
        assert_eq!(r2.angle_deg(), Some(30.0));
        assert_eq!(r2.length_mm(), None);
        assert!(catalog.template("XYZ").is_none());
    }

    #[test]
    fn toml_katalog_ueberspringt_fehlerhafte_eintraege() {
        let toml = r#"
            [[template]]
            id = "S100"
            kind = "straight"
            length_mm = 100.0

            [[template]]
            id = "KAPUTT"
            kind = "curve"
            radius_mm = 300.0

            [[template]]
            id = "W5"
            kind = "switch"
            length_mm = 200.0
            angle_deg = 12.0
            hand = "left"
        "#;
        let catalog = MemoryCatalog::from_toml_str(toml).expect("TOML gültig");
        assert_eq!(catalog.ids(), vec!["S100", "W5"]);
        let w5 = catalog.template("W5").expect("W5 geladen");
        assert!(matches!(
            w5.geometry,
            TrackGeometry::Switch {
                hand: Hand::Left,
                ..
            }
        ));
    }

    #[test]
    fn record_mit_falschen_ports_wird_abgelehnt() {
        let record = TemplateRecord {
            id: "G1".into(),
            kind: TrackKind::Straight,
            ports: Some(vec!["A".into(), "C".into()]),
            length_mm: Some(10.0),
            radius_mm: None,
            angle_deg: None,
            hand: None,
        };
        assert!(matches!(
            TrackTemplate::try_from(record),
            Err(TemplateError::PortMismatch { .. })
        ));
    }

    #[test]
    fn record_mit_negativer_laenge_wird_abgelehnt() {
        let record = TemplateRecord {
            id: "G1".into(),
            kind: TrackKind::Straight,
            ports: None,
            length_mm: Some(-5.0),
            radius_mm: None,
            angle_deg: None,
            hand: None,
        };
        assert_eq!(
            TrackTemplate::try_from(record),
            Err(TemplateError::NonPositive {
                id: "G1".into(),
                field: "length_mm",
                value: -5.0
            })
        );
    }
}
