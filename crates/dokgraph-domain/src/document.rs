//! The typed knowledge document produced by extraction

use crate::tier::Tier;
use serde::{Deserialize, Serialize};

/// One ranked entry of a tier section
///
/// `index` is the 1-based rank of the entry among its siblings by priority.
/// It is the coordinate every connection refers to and is only meaningful
/// within the extraction pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// 1-based rank within the tier
    pub index: u32,

    /// Heading, followed by the note on the next line when present
    pub content: String,

    /// Rendered subtrees of the entry's direct children
    #[serde(default)]
    pub children: Vec<String>,
}

/// A tier section: its full rendering plus the ranked entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Markdown rendering of the whole section subtree
    pub raw: String,

    /// Direct children of the section heading, in rank order
    pub items: Vec<KnowledgeItem>,
}

impl Section {
    /// Whether `index` refers to one of this section's items
    pub fn contains_index(&self, index: u32) -> bool {
        self.items.iter().any(|item| item.index == index)
    }
}

/// A knowledge document extracted from one outline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Rendered owners section, empty when absent
    #[serde(default)]
    pub owners: String,

    /// Rendered purpose section, empty when absent
    #[serde(default)]
    pub purpose: String,

    /// Rendered experts section, empty when absent
    #[serde(default)]
    pub experts: String,

    /// DOK2 knowledge tree
    #[serde(default)]
    pub tier2: Option<Section>,

    /// DOK3 insights
    #[serde(default)]
    pub tier3: Option<Section>,

    /// DOK4 spiky points of view
    #[serde(default)]
    pub tier4: Option<Section>,
}

impl Document {
    /// Section for a tier, if one was found
    pub fn section(&self, tier: Tier) -> Option<&Section> {
        match tier {
            Tier::Dok2 => self.tier2.as_ref(),
            Tier::Dok3 => self.tier3.as_ref(),
            Tier::Dok4 => self.tier4.as_ref(),
        }
    }

    /// Items of a tier; empty when the section is absent
    pub fn items(&self, tier: Tier) -> &[KnowledgeItem] {
        self.section(tier)
            .map(|section| section.items.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any tier contributes at least one item
    pub fn has_tier_items(&self) -> bool {
        Tier::ALL.iter().any(|tier| !self.items(*tier).is_empty())
    }
}
