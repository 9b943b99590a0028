//! Persisted document records

use crate::{ConnectionSet, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as held by a storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Record identifier
    pub id: String,

    /// Document title (root heading)
    pub name: String,

    /// Source URL the outline was fetched from
    pub url: String,

    /// First time the record was saved
    pub created_at: DateTime<Utc>,

    /// Last time the record or its connections changed
    pub updated_at: DateTime<Utc>,

    /// Markdown rendering of the whole outline
    #[serde(default)]
    pub raw_markdown: String,

    /// Extracted document
    pub document: Document,

    /// Cached connection analysis, populated lazily
    #[serde(default)]
    pub connections: Option<ConnectionSet>,
}

impl StoredDocument {
    /// Summary view used by listings
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing entry for a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Record identifier
    pub id: String,

    /// Document title
    pub name: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}
