//! Fuzzy location of top-level document sections
//!
//! Documents are hand-authored, so section headings vary in casing,
//! hyphenation and pluralisation. Each section is matched by plain
//! case-insensitive substring containment against a fixed vocabulary.

use dokgraph_domain::RawNode;

/// A top-level section of a knowledge document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Document owners
    Owners,
    /// Purpose or mission statement
    Purpose,
    /// Referenced experts
    Experts,
    /// DOK2 knowledge tree
    Dok2,
    /// DOK3 insights
    Dok3,
    /// DOK4 spiky points of view
    Dok4,
}

const OWNERS_VARIANTS: &[&str] = &["Owner", "Owners", "owner", "owners"];

const PURPOSE_VARIANTS: &[&str] = &["Purpose", "purpose", "Mission", "mission"];

const EXPERTS_VARIANTS: &[&str] = &["Experts", "experts", "Expert", "expert"];

const DOK2_VARIANTS: &[&str] = &[
    "DOK2 - Knowledge Tree",
    "DOK2 - knowledge tree",
    "DOK2-Knowledge Tree",
    "DOK2",
    "Knowledge Tree",
    "knowledge tree",
    "DOK1 and DOK2",
    "DOK1/DOK2",
];

const DOK3_VARIANTS: &[&str] = &[
    "DOK3 - Insights",
    "DOK3-Insights",
    "DOK3 - insights",
    "DOK3",
    "Insights",
    "insights",
];

const DOK4_VARIANTS: &[&str] = &[
    "DOK4 - SPOV",
    "DOK4-SPOV",
    "DOK4 - SPOVs",
    "DOK4-SPOVs",
    "DOK4",
    "SPOV",
    "SPOVs",
    "SpikyPOVs",
    "Spiky POVs",
    "SpikyPOV",
];

impl SectionKind {
    /// Every section, in extraction order
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Owners,
        SectionKind::Purpose,
        SectionKind::Experts,
        SectionKind::Dok2,
        SectionKind::Dok3,
        SectionKind::Dok4,
    ];

    /// Heading substrings that identify this section, in priority order
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Owners => OWNERS_VARIANTS,
            SectionKind::Purpose => PURPOSE_VARIANTS,
            SectionKind::Experts => EXPERTS_VARIANTS,
            SectionKind::Dok2 => DOK2_VARIANTS,
            SectionKind::Dok3 => DOK3_VARIANTS,
            SectionKind::Dok4 => DOK4_VARIANTS,
        }
    }
}

/// The first node in the list that declares no parent
pub fn find_root(nodes: &[RawNode]) -> Option<&RawNode> {
    nodes.iter().find(|node| node.is_root())
}

/// Find the root's direct child whose heading contains any of `variants`
///
/// Children are scanned in input order and each child is tested against every
/// variant before moving on, so the earliest matching child wins. Matching is
/// case-insensitive substring containment.
pub fn find_section_node<'a, S: AsRef<str>>(
    nodes: &'a [RawNode],
    variants: &[S],
) -> Option<&'a RawNode> {
    let root = find_root(nodes)?;
    let lowered: Vec<String> = variants
        .iter()
        .map(|variant| variant.as_ref().to_lowercase())
        .collect();

    nodes
        .iter()
        .filter(|node| node.parent() == Some(root.id.as_str()))
        .find(|node| heading_matches(node.heading(), &lowered))
}

/// Locate the node for a known section kind
pub fn find_section(nodes: &[RawNode], kind: SectionKind) -> Option<&RawNode> {
    find_section_node(nodes, kind.variants())
}

fn heading_matches(heading: &str, lowered_variants: &[String]) -> bool {
    let heading = heading.to_lowercase();
    lowered_variants
        .iter()
        .any(|variant| heading.contains(variant.as_str()))
}
