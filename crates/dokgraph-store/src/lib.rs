//! Dokgraph Storage Layer
//!
//! Implements the `DocumentStore` trait over two backends.
//!
//! # Backends
//!
//! - `SqliteStore`: one `documents` table with JSON columns for the
//!   extracted document and its cached connections
//! - `JsonFileStore`: every record in a single JSON file, replaced
//!   atomically on each mutation
//!
//! Both backends upsert by id, keep the original `created_at` on update,
//! drop cached connections when a document is re-saved, and list newest
//! first.
//!
//! # Examples
//!
//! ```no_run
//! use dokgraph_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for document operations
//! ```

#![warn(missing_docs)]

mod json_file;
mod sqlite;

use thiserror::Error;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
