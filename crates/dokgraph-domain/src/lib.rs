//! Dokgraph Domain Layer
//!
//! Core data model for knowledge documents and the trait interfaces every
//! other crate depends upon. Nothing in here performs I/O.
//!
//! ## Key Concepts
//!
//! - **RawNode**: one flat outline node as fetched from the outline service
//! - **Document**: owners/purpose/experts plus three tiers of knowledge items
//! - **KnowledgeItem**: a ranked entry inside a tier section
//! - **Connection**: a directed supports/contradicts edge between adjacent tiers
//! - **Tier**: DOK2 (knowledge), DOK3 (insights), DOK4 (spiky points of view)
//!
//! ## Architecture
//!
//! - Pure data and trait definitions
//! - Storage, model and fetch implementations live in other crates
//! - `serde` derives on every value that crosses a storage or HTTP boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connection;
pub mod document;
pub mod node;
pub mod record;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use connection::{Connection, ConnectionKind, ConnectionSet};
pub use document::{Document, KnowledgeItem, Section};
pub use node::RawNode;
pub use record::{DocumentSummary, StoredDocument};
pub use tier::Tier;
