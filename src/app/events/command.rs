use crate::core::EdgeId;
use glam::DVec2;

/// Commands sind mutierende oder prüfende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackPlanCommand {
    // === Platzierung ===
    /// Gleis aus dem Katalog platzieren
    AddEdge {
        template_id: String,
        position: DVec2,
        rotation_deg: f64,
    },
    /// Gleis an neue Position setzen
    MoveEdge { edge: EdgeId, position: DVec2 },
    /// Gleis auf neue Rotation setzen
    RotateEdge { edge: EdgeId, rotation_deg: f64 },
    /// Gleis samt Verbindungen löschen
    RemoveEdge { edge: EdgeId },
    /// Rückmelder-Nummer setzen oder entfernen
    SetFeedbackPoint {
        edge: EdgeId,
        feedback_point: Option<u32>,
    },
    /// Prellbock an einem Port setzen oder entfernen
    SetEndCap {
        edge: EdgeId,
        port: String,
        capped: bool,
    },

    // === Verbindungen ===
    /// Am nächsten offenen Port einrasten
    TrySnapAndConnect { edge: EdgeId },
    /// Zwei Ports direkt verbinden
    ConnectPorts {
        a_edge: EdgeId,
        a_port: String,
        b_edge: EdgeId,
        b_port: String,
    },
    /// Verbindung an einem Port trennen
    Disconnect { edge: EdgeId, port: String },
    /// Alle Verbindungen eines Gleises trennen
    DisconnectAll { edge: EdgeId },

    // === Gruppen & Drag ===
    /// Verbundene Gruppe um Delta verschieben
    MoveGroup { edge: EdgeId, delta: DVec2 },
    /// Drag an einem Gleis starten
    BeginDrag { edge: EdgeId, pointer: DVec2 },
    /// Zeiger während des Drags bewegt
    UpdateDrag { pointer: DVec2 },
    /// Zeiger losgelassen: einrasten
    ReleaseDrag,
    /// Drag abbrechen
    CancelDrag,

    // === Plan ===
    /// Strukturprüfung ausführen
    Validate,
    /// Gleisplan leeren
    Clear,
}

impl TrackPlanCommand {
    /// `false` für reine Abfragen, die weder Plan noch Drag-Zustand ändern.
    pub fn mutates_plan(&self) -> bool {
        !matches!(self, TrackPlanCommand::Validate)
    }
}
