//! Assemble a typed knowledge document from a flat outline

use crate::error::StructureError;
use crate::sections::{find_root, find_section, SectionKind};
use crate::tree::{Tree, TreeNode};
use dokgraph_domain::{Document, KnowledgeItem, RawNode, Section};
use tracing::debug;

/// Title used when the outline root has no heading
pub const UNTITLED: &str = "Untitled Document";

/// Everything one extraction pass produces
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Root heading, or [`UNTITLED`]
    pub title: String,

    /// The typed document
    pub document: Document,

    /// Markdown rendering of every root, in input order
    pub markdown: String,
}

/// Extract the typed document, title and full rendering from `nodes`
///
/// Extraction is deterministic: the same node list always yields an
/// identical result.
///
/// # Errors
///
/// Fails with a [`StructureError`] when the node list cannot form a tree.
pub fn extract(nodes: &[RawNode]) -> Result<Extraction, StructureError> {
    let tree = Tree::build(nodes)?;
    let document = extract_from_tree(nodes, &tree);

    debug!(
        nodes = nodes.len(),
        tier2 = document.tier2.as_ref().map_or(0, |s| s.items.len()),
        tier3 = document.tier3.as_ref().map_or(0, |s| s.items.len()),
        tier4 = document.tier4.as_ref().map_or(0, |s| s.items.len()),
        "extracted document"
    );

    Ok(Extraction {
        title: extract_title(nodes),
        document,
        markdown: tree.render(),
    })
}

/// Extract only the typed document
pub fn extract_document(nodes: &[RawNode]) -> Result<Document, StructureError> {
    let tree = Tree::build(nodes)?;
    Ok(extract_from_tree(nodes, &tree))
}

/// Heading of the first root node, or [`UNTITLED`]
pub fn extract_title(nodes: &[RawNode]) -> String {
    find_root(nodes)
        .map(RawNode::heading)
        .filter(|heading| !heading.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Split a tier section into ranked items
///
/// Items are the section's direct children ranked 1..N by priority. Each
/// item's children are the depth-0 renderings of its own direct children,
/// with trailing whitespace removed.
pub fn parse_section(section: &TreeNode) -> Section {
    let items = section
        .sorted_children()
        .into_iter()
        .enumerate()
        .map(|(rank, child)| KnowledgeItem {
            index: rank as u32 + 1,
            content: item_content(&child.node),
            children: child
                .sorted_children()
                .into_iter()
                .map(|sub| sub.render(0).trim_end().to_string())
                .collect(),
        })
        .collect();

    Section {
        raw: section.render(0),
        items,
    }
}

fn extract_from_tree(nodes: &[RawNode], tree: &Tree) -> Document {
    let root = find_root(nodes).and_then(|root| tree.root(&root.id));

    let plain = |kind: SectionKind| {
        section_tree(nodes, root, kind)
            .map(|node| node.render(0))
            .unwrap_or_default()
    };
    let ranked = |kind: SectionKind| section_tree(nodes, root, kind).map(parse_section);

    Document {
        owners: plain(SectionKind::Owners),
        purpose: plain(SectionKind::Purpose),
        experts: plain(SectionKind::Experts),
        tier2: ranked(SectionKind::Dok2),
        tier3: ranked(SectionKind::Dok3),
        tier4: ranked(SectionKind::Dok4),
    }
}

/// Subtree of the root's child that the locator picked for `kind`
fn section_tree<'t>(
    nodes: &[RawNode],
    root: Option<&'t TreeNode>,
    kind: SectionKind,
) -> Option<&'t TreeNode> {
    let found = find_section(nodes, kind)?;
    root?.children.iter().find(|child| child.id() == found.id)
}

fn item_content(node: &RawNode) -> String {
    match node.note_text() {
        Some(note) => format!("{}\n{}", node.heading(), note),
        None => node.heading().to_string(),
    }
}
