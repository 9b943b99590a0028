//! Connection module - directed edges between adjacent tiers

use serde::{Deserialize, Serialize};

/// How a lower-tier item relates to a higher-tier item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// The lower item provides evidence or foundation for the higher one
    Supports,

    /// The lower item challenges the higher one
    Contradicts,
}

impl ConnectionKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Supports => "supports",
            ConnectionKind::Contradicts => "contradicts",
        }
    }

    /// Parse a kind from model output (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "supports" => Some(ConnectionKind::Supports),
            "contradicts" => Some(ConnectionKind::Contradicts),
            _ => None,
        }
    }

    /// Noun used in templated reasoning text
    fn noun(&self) -> &'static str {
        match self {
            ConnectionKind::Supports => "support",
            ConnectionKind::Contradicts => "contradiction",
        }
    }
}

/// A directed edge from a lower-tier item to a higher-tier item
///
/// Connections are derived data: they can be recomputed at any time and are
/// only valid against the extraction pass whose indices they reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Index of the item in the lower tier
    pub source_index: u32,

    /// Index of the item in the higher tier
    pub target_index: u32,

    /// Relationship kind
    #[serde(rename = "type")]
    pub kind: ConnectionKind,

    /// Confidence score (0-100)
    #[serde(alias = "score")]
    pub confidence_score: u8,

    /// Short explanation of the edge
    pub reasoning: String,
}

impl Connection {
    /// Create an inferred connection with templated reasoning
    pub fn inferred(
        source_index: u32,
        target_index: u32,
        kind: ConnectionKind,
        confidence_score: u8,
    ) -> Self {
        Self {
            source_index,
            target_index,
            kind,
            confidence_score,
            reasoning: format!("Direct {} identified", kind.noun()),
        }
    }
}

/// All inferred connections of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSet {
    /// DOK2 items (source) to DOK3 items (target)
    #[serde(default)]
    pub tier2_to_tier3: Vec<Connection>,

    /// DOK3 items (source) to DOK4 items (target)
    #[serde(default)]
    pub tier3_to_tier4: Vec<Connection>,
}

impl ConnectionSet {
    /// Total number of edges across both tier pairs
    pub fn len(&self) -> usize {
        self.tier2_to_tier3.len() + self.tier3_to_tier4.len()
    }

    /// Whether no edges were inferred
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
