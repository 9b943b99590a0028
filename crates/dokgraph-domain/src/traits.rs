//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction/analysis core
//! and its collaborators. Implementations live in other crates.

use crate::{ConnectionSet, Document, DocumentSummary, RawNode, StoredDocument};
use async_trait::async_trait;

/// Trait for persisting extracted documents and their connection analyses
///
/// Implemented by the infrastructure layer (dokgraph-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Insert or replace the document stored under `id`
    ///
    /// Replacing keeps the original creation time and drops any cached
    /// connections, since item indices do not survive re-extraction.
    fn save(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        document: &Document,
        raw_markdown: &str,
    ) -> Result<StoredDocument, Self::Error>;

    /// Get a document by ID
    fn get(&self, id: &str) -> Result<Option<StoredDocument>, Self::Error>;

    /// List all documents, newest first
    fn list(&self) -> Result<Vec<DocumentSummary>, Self::Error>;

    /// Delete a document; returns whether it existed
    fn delete(&mut self, id: &str) -> Result<bool, Self::Error>;

    /// Replace the cached connections of a document; returns whether it existed
    fn save_connections(
        &mut self,
        id: &str,
        connections: &ConnectionSet,
    ) -> Result<bool, Self::Error>;

    /// Cached connections of a document, if any were computed
    fn get_connections(&self, id: &str) -> Result<Option<ConnectionSet>, Self::Error>;
}

/// Trait for single-turn text completion
///
/// Implemented by the infrastructure layer (dokgraph-llm)
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Error type for model operations
    type Error: std::fmt::Display + Send;

    /// Complete a prompt, returning the raw text reply
    async fn infer(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for fetching the flat node list behind a shared outline URL
///
/// Implemented by the infrastructure layer (dokgraph-fetch)
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// Error type for fetch operations
    type Error: std::fmt::Display + Send;

    /// Fetch every node of the outline at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<RawNode>, Self::Error>;
}
