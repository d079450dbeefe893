//! Serialisierbarer Snapshot eines Gleisplans.
//!
//! Gespeichert werden nur Gleise (inklusive Verbindungsliste). Knoten werden
//! beim Laden durch erneutes Verbinden rekonstruiert. Das Byte-Format wählt
//! der Aufrufer.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::TrackPlanSession;
use crate::core::{EdgeId, PortId, PortRef};

/// Aktuelle Snapshot-Version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Ein gespeichertes Gleis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub template_id: String,
    pub position: DVec2,
    pub rotation_deg: f64,
    /// Eigener Port → Gegenstelle
    #[serde(default)]
    pub connections: BTreeMap<PortId, PortRef>,
    #[serde(default)]
    pub feedback_point: Option<u32>,
    #[serde(default)]
    pub end_caps: BTreeSet<PortId>,
}

/// Alle Gleise eines Plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPlanSnapshot {
    pub version: u32,
    pub edges: Vec<EdgeRecord>,
}

/// Zusammenfassung eines Ladevorgangs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub edges_loaded: usize,
    pub edges_skipped: usize,
    pub connections_restored: usize,
    pub connections_skipped: usize,
}

impl TrackPlanSession {
    /// Erstellt einen Snapshot aller Gleise in ID-Reihenfolge.
    pub fn to_snapshot(&self) -> TrackPlanSnapshot {
        let edges = self
            .graph
            .edges_sorted()
            .into_iter()
            .map(|edge| EdgeRecord {
                id: edge.id,
                template_id: edge.template_id.clone(),
                position: edge.position,
                rotation_deg: edge.rotation_deg,
                connections: edge
                    .endpoints
                    .keys()
                    .filter_map(|port| {
                        self.graph
                            .connected_port(edge.id, port.as_str())
                            .map(|peer| (port.clone(), peer))
                    })
                    .collect(),
                feedback_point: edge.feedback_point,
                end_caps: edge.end_caps.clone(),
            })
            .collect();

        TrackPlanSnapshot {
            version: SNAPSHOT_VERSION,
            edges,
        }
    }

    /// Ersetzt den Plan durch den Snapshot.
    ///
    /// Gleise mit unbekannter Vorlage oder doppelter ID sowie einseitige oder
    /// widersprüchliche Verbindungen werden geloggt und übersprungen.
    pub fn load_snapshot(&mut self, snapshot: &TrackPlanSnapshot) -> LoadReport {
        if snapshot.version != SNAPSHOT_VERSION {
            log::warn!(
                "Snapshot-Version {} weicht von {} ab, lade trotzdem",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        self.clear();
        // Geladener Stand ist neuer Ausgangspunkt für das Command-Log
        self.command_log.reset();
        let mut report = LoadReport::default();

        let mut records: Vec<&EdgeRecord> = snapshot.edges.iter().collect();
        records.sort_by_key(|r| r.id);

        let mut loaded: Vec<&EdgeRecord> = Vec::with_capacity(records.len());
        for record in records {
            let Some(template) = self.catalog.template(&record.template_id) else {
                log::warn!(
                    "Gleis {} übersprungen: unbekannte Vorlage {}",
                    record.id,
                    record.template_id
                );
                report.edges_skipped += 1;
                continue;
            };
            if self.graph.contains_edge(record.id) {
                log::warn!("Gleis {} übersprungen: ID doppelt vergeben", record.id);
                report.edges_skipped += 1;
                continue;
            }
            if !self
                .graph
                .insert_edge_with_id(record.id, template, record.position, record.rotation_deg)
            {
                log::warn!("Gleis {} übersprungen: ID außerhalb des Wertebereichs", record.id);
                report.edges_skipped += 1;
                continue;
            }
            self.graph.set_feedback_point(record.id, record.feedback_point);
            report.edges_loaded += 1;
            loaded.push(record);
        }

        // Verbindungen nur übernehmen, wenn beide Seiten sie bestätigen
        let declared: HashMap<PortRef, &PortRef> = loaded
            .iter()
            .flat_map(|r| {
                r.connections
                    .iter()
                    .map(|(port, peer)| (PortRef::new(r.id, port.clone()), peer))
            })
            .collect();
        let mut pairs: Vec<(&PortRef, &PortRef)> = declared.iter().map(|(k, v)| (k, *v)).collect();
        pairs.sort();

        for (own, peer) in pairs {
            if declared.get(peer).copied() != Some(own) {
                log::warn!("Verbindung {}→{} übersprungen: einseitig", own, peer);
                report.connections_skipped += 1;
                continue;
            }
            if own > peer {
                continue;
            }
            if self
                .graph
                .try_connect(own.edge, own.port.as_str(), peer.edge, peer.port.as_str())
            {
                report.connections_restored += 1;
            } else {
                log::warn!("Verbindung {}↔{} übersprungen: nicht verbindbar", own, peer);
                report.connections_skipped += 1;
            }
        }

        for record in &loaded {
            for port in &record.end_caps {
                if !self.graph.set_end_cap(record.id, port.as_str(), true) {
                    log::warn!("Prellbock an {}.{} übersprungen", record.id, port);
                }
            }
        }

        log::info!(
            "Snapshot geladen: {} Gleise, {} Verbindungen ({} Gleise, {} Verbindungen übersprungen)",
            report.edges_loaded,
            report.connections_restored,
            report.edges_skipped,
            report.connections_skipped
        );
        report
    }
}

impl EdgeRecord {
    /// Eintrag ohne Verbindungen, Rückmelder und Prellböcke.
    pub fn new(id: EdgeId, template_id: &str, position: DVec2, rotation_deg: f64) -> Self {
        Self {
            id,
            template_id: template_id.to_owned(),
            position,
            rotation_deg,
            connections: BTreeMap::new(),
            feedback_point: None,
            end_caps: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::{add_edge, set_end_cap, set_feedback_point};

    fn sample_session() -> (TrackPlanSession, Vec<EdgeId>) {
        let mut session = TrackPlanSession::with_builtin_catalog();
        let a = add_edge(&mut session, "G231", DVec2::ZERO, 0.0).expect("G231");
        let b = add_edge(&mut session, "W10L", DVec2::new(231.0, 0.0), 0.0).expect("W10L");
        let c = add_edge(&mut session, "G231", DVec2::new(462.0, 0.0), 0.0).expect("G231");
        assert!(session.graph.try_connect(a, "B", b, "A"));
        assert!(session.graph.try_connect(b, "B", c, "A"));
        assert!(set_end_cap(&mut session, b, "C", true));
        assert!(set_feedback_point(&mut session, c, Some(12)));
        (session, vec![a, b, c])
    }

    #[test]
    fn snapshot_enthaelt_beide_seiten_jeder_verbindung() {
        let (session, ids) = sample_session();
        let snapshot = session.to_snapshot();
        assert_eq!(snapshot.edges.len(), 3);
        let middle = &snapshot.edges[1];
        assert_eq!(middle.connections.get("A"), Some(&PortRef::new(ids[0], "B")));
        assert_eq!(middle.connections.get("B"), Some(&PortRef::new(ids[2], "A")));
        assert!(middle.end_caps.contains("C"));
    }

    #[test]
    fn laden_rekonstruiert_knoten_und_attribute() {
        let (session, ids) = sample_session();
        let snapshot = session.to_snapshot();

        let mut restored = TrackPlanSession::with_builtin_catalog();
        let report = restored.load_snapshot(&snapshot);
        assert_eq!(report.edges_loaded, 3);
        assert_eq!(report.connections_restored, 2);
        assert_eq!(report.connections_skipped, 0);
        assert_eq!(restored.node_count(), 2);
        assert_eq!(
            restored.graph.connected_port(ids[1], "B"),
            Some(PortRef::new(ids[2], "A"))
        );
        assert_eq!(restored.graph.edge(ids[2]).and_then(|e| e.feedback_point), Some(12));
        assert!(restored.graph.edge(ids[1]).is_some_and(|e| e.is_end_capped("C")));
        assert_eq!(restored.to_snapshot(), snapshot);
    }

    #[test]
    fn einseitige_verbindung_und_unbekannte_vorlage_werden_uebersprungen() {
        let mut a = EdgeRecord::new(EdgeId(1), "G231", DVec2::ZERO, 0.0);
        a.connections.insert(PortId::b(), PortRef::new(EdgeId(2), "A"));
        let b = EdgeRecord::new(EdgeId(2), "G231", DVec2::new(231.0, 0.0), 0.0);
        let ghost = EdgeRecord::new(EdgeId(3), "XXL", DVec2::ZERO, 0.0);
        let snapshot = TrackPlanSnapshot {
            version: SNAPSHOT_VERSION,
            edges: vec![a, b, ghost],
        };

        let mut session = TrackPlanSession::with_builtin_catalog();
        let report = session.load_snapshot(&snapshot);
        assert_eq!(report.edges_loaded, 2);
        assert_eq!(report.edges_skipped, 1);
        assert_eq!(report.connections_skipped, 1);
        assert_eq!(session.node_count(), 0);
        assert!(!session.graph.is_port_connected(EdgeId(1), "B"));
    }

    #[test]
    fn maximale_id_wird_uebersprungen_ohne_zaehler_zu_beschaedigen() {
        let edges = vec![
            EdgeRecord::new(EdgeId(1), "G231", DVec2::ZERO, 0.0),
            EdgeRecord::new(EdgeId(u64::MAX), "G231", DVec2::new(231.0, 0.0), 0.0),
        ];
        let snapshot = TrackPlanSnapshot {
            version: SNAPSHOT_VERSION,
            edges,
        };

        let mut session = TrackPlanSession::with_builtin_catalog();
        let report = session.load_snapshot(&snapshot);
        assert_eq!(report.edges_loaded, 1);
        assert_eq!(report.edges_skipped, 1);
        assert!(!session.graph.contains_edge(EdgeId(u64::MAX)));

        let fresh = add_edge(&mut session, "G62", DVec2::ZERO, 0.0).expect("G62");
        assert_eq!(fresh, EdgeId(2));
    }

    #[test]
    fn doppelte_id_im_snapshot_wird_uebersprungen() {
        let edges = vec![
            EdgeRecord::new(EdgeId(4), "G231", DVec2::ZERO, 0.0),
            EdgeRecord::new(EdgeId(4), "R1", DVec2::new(500.0, 0.0), 0.0),
        ];
        let snapshot = TrackPlanSnapshot {
            version: SNAPSHOT_VERSION,
            edges,
        };

        let mut session = TrackPlanSession::with_builtin_catalog();
        let report = session.load_snapshot(&snapshot);
        assert_eq!(report.edges_loaded, 1);
        assert_eq!(report.edges_skipped, 1);
        assert_eq!(session.graph.edge(EdgeId(4)).map(|e| e.template_id.as_str()), Some("G231"));
    }

    #[test]
    fn neue_ids_nach_laden_kollidieren_nicht() {
        let (session, _) = sample_session();
        let snapshot = session.to_snapshot();
        let mut restored = TrackPlanSession::with_builtin_catalog();
        restored.load_snapshot(&snapshot);
        let fresh = add_edge(&mut restored, "G62", DVec2::ZERO, 0.0).expect("G62");
        assert!(fresh > EdgeId(3));
    }
}
