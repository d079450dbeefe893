//! Stabile Handles für Gleisstücke, Knoten und Ports.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stabile ID eines platzierten Gleisstücks (Edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

/// Stabile ID eines Verbindungsknotens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Name eines Ports innerhalb seines Gleisstücks ("A", "B", "C").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    /// Einfahrt
    pub fn a() -> Self {
        Self::from("A")
    }

    /// Ausfahrt
    pub fn b() -> Self {
        Self::from("B")
    }

    /// Abzweig einer Weiche
    pub fn c() -> Self {
        Self::from("C")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PortId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PortId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for PortId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verweis auf einen konkreten Port eines konkreten Gleisstücks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub edge: EdgeId,
    pub port: PortId,
}

impl PortRef {
    pub fn new(edge: EdgeId, port: impl Into<PortId>) -> Self {
        Self {
            edge,
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.edge, self.port)
    }
}
