//! Tier module - depth-of-knowledge levels of a document

use serde::{Deserialize, Serialize};

/// Knowledge tier of a document section
///
/// Tiers form a ladder; connections only ever link adjacent rungs:
/// - Dok2: foundational knowledge
/// - Dok3: insights derived from that knowledge
/// - Dok4: opinionated stances built on the insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Knowledge tree
    Dok2,

    /// Insights
    Dok3,

    /// Spiky points of view
    Dok4,
}

impl Tier {
    /// All tiers, lowest first
    pub const ALL: [Tier; 3] = [Tier::Dok2, Tier::Dok3, Tier::Dok4];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Dok2 => "dok2",
            Tier::Dok3 => "dok3",
            Tier::Dok4 => "dok4",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_ordered_lowest_first() {
        assert!(Tier::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_display_and_wire_names_agree() {
        for tier in Tier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier));
        }
        assert_eq!(Tier::Dok3.to_string(), "dok3");
    }
}
