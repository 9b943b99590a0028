//! Dokgraph Extractor
//!
//! Turns a flat outline node list into a typed three-tier knowledge document.
//!
//! # Architecture
//!
//! ```text
//! RawNode list → Tree (cycle-checked) → Section Locator → Document
//! ```
//!
//! - [`Tree`]: links nodes to their parents and renders subtrees as markdown
//! - [`find_section_node`]: fuzzy, case-insensitive heading lookup among the
//!   root's direct children
//! - [`extract`]: owners/purpose/experts as plain renderings, tiers 2-4 as
//!   ranked [`dokgraph_domain::KnowledgeItem`] lists
//!
//! Everything here is synchronous and free of side effects.
//!
//! # Example Usage
//!
//! ```
//! use dokgraph_domain::RawNode;
//! use dokgraph_extractor::extract;
//!
//! let nodes = vec![
//!     RawNode::new("root", None, "Soil Health"),
//!     RawNode::new("k", Some("root"), "DOK2 - Knowledge Tree"),
//!     RawNode::new("k1", Some("k"), "Cover crops fix nitrogen"),
//! ];
//!
//! let extraction = extract(&nodes).unwrap();
//! assert_eq!(extraction.title, "Soil Health");
//! assert_eq!(extraction.document.tier2.unwrap().items[0].index, 1);
//! ```

#![warn(missing_docs)]

mod document;
mod error;
mod sections;
mod tree;

pub use document::{extract, extract_document, extract_title, parse_section, Extraction, UNTITLED};
pub use error::StructureError;
pub use sections::{find_root, find_section, find_section_node, SectionKind};
pub use tree::{render_markdown, Tree, TreeNode, MAX_DEPTH};
