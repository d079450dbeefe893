//! Port-Geometrie: lokale Offsets und Ausrichtungswinkel je Grundform.
//!
//! Lokales Koordinatensystem: Rotation 0 zeigt entlang +X, positive Winkel
//! drehen gegen den Uhrzeigersinn. Der Ursprung liegt in der logischen Mitte
//! des Gleisstücks (bei Bögen: Mitte des Bogens). Alle Funktionen sind rein
//! und liefern `None` für Ports, die die Grundform nicht kennt.

use super::catalog::TrackGeometry;
use glam::DVec2;

/// Abstand des Abzweig-Ports C relativ zur halben Stammgleis-Länge.
pub const SWITCH_BRANCH_FACTOR: f64 = 0.7;

/// Lokale Lage eines Ports bei Rotation 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPort {
    /// Offset zur Gleismitte in mm
    pub offset: DVec2,
    /// Nach außen zeigende Richtung in Grad
    pub angle_deg: f64,
}

/// Normalisiert einen Winkel nach [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid kann bei winzigen negativen Werten exakt 360.0 liefern
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Kleinster Betrag zwischen zwei Richtungen, in [0, 180].
pub fn angle_deviation(a_deg: f64, b_deg: f64) -> f64 {
    let d = normalize_deg(a_deg - b_deg);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Dreht einen Vektor um `deg` Grad gegen den Uhrzeigersinn.
pub fn rotate_deg(v: DVec2, deg: f64) -> DVec2 {
    DVec2::from_angle(deg.to_radians()).rotate(v)
}

/// Lokale Lage eines Ports der gegebenen Geometrie.
pub fn local_port(geometry: &TrackGeometry, port: &str) -> Option<LocalPort> {
    match *geometry {
        TrackGeometry::Straight { length_mm } => straight_port(length_mm, port),
        TrackGeometry::Curve {
            radius_mm,
            angle_deg,
        } => {
            let half = (angle_deg.abs() * 0.5).to_radians();
            let sign = angle_deg.signum();
            // Bogenmittelpunkt im Ursprung, Kreiszentrum bei (0, sign * R)
            let y = sign * radius_mm * (1.0 - half.cos());
            let x = radius_mm * half.sin();
            let half_deg = sign * angle_deg.abs() * 0.5;
            match port {
                "A" => Some(LocalPort {
                    offset: DVec2::new(-x, y),
                    angle_deg: normalize_deg(180.0 - half_deg),
                }),
                "B" => Some(LocalPort {
                    offset: DVec2::new(x, y),
                    angle_deg: normalize_deg(half_deg),
                }),
                _ => None,
            }
        }
        TrackGeometry::Switch {
            length_mm,
            diverge_angle_deg,
            hand,
        } => match port {
            "C" => {
                let branch_angle = hand.sign() * diverge_angle_deg;
                let reach = SWITCH_BRANCH_FACTOR * length_mm * 0.5;
                Some(LocalPort {
                    offset: rotate_deg(DVec2::new(reach, 0.0), branch_angle),
                    angle_deg: normalize_deg(branch_angle),
                })
            }
            _ => straight_port(length_mm, port),
        },
    }
}

fn straight_port(length_mm: f64, port: &str) -> Option<LocalPort> {
    let half = length_mm * 0.5;
    match port {
        "A" => Some(LocalPort {
            offset: DVec2::new(-half, 0.0),
            angle_deg: 180.0,
        }),
        "B" => Some(LocalPort {
            offset: DVec2::new(half, 0.0),
            angle_deg: 0.0,
        }),
        _ => None,
    }
}

/// Offset eines Ports zur Gleisposition in Weltkoordinaten.
pub fn port_world_offset(geometry: &TrackGeometry, port: &str, rotation_deg: f64) -> Option<DVec2> {
    local_port(geometry, port).map(|local| rotate_deg(local.offset, rotation_deg))
}

/// Nach außen zeigende Richtung eines Ports in Weltkoordinaten, in [0, 360).
pub fn port_facing_angle(geometry: &TrackGeometry, port: &str, rotation_deg: f64) -> Option<f64> {
    local_port(geometry, port).map(|local| normalize_deg(rotation_deg + local.angle_deg))
}

/// Rotation, bei der `port` in Richtung `facing_deg` zeigt.
pub fn rotation_for_facing(geometry: &TrackGeometry, port: &str, facing_deg: f64) -> Option<f64> {
    local_port(geometry, port).map(|local| normalize_deg(facing_deg - local.angle_deg))
}

/// Gleisposition, bei der `port` unter `rotation_deg` exakt auf `target` liegt.
pub fn position_for_port(
    geometry: &TrackGeometry,
    port: &str,
    rotation_deg: f64,
    target: DVec2,
) -> Option<DVec2> {
    port_world_offset(geometry, port, rotation_deg).map(|offset| target - offset)
}
