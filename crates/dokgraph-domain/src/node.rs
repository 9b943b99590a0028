//! Raw outline nodes as delivered by the fetch collaborator

use serde::{Deserialize, Serialize};

/// A single node of a shared outline, exactly as fetched
///
/// Nodes arrive as a flat list; the hierarchy is expressed only through
/// `parent_id`. A node with no parent (or a null parent) is a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Identifier unique within one fetched outline
    pub id: String,

    /// Identifier of the parent node, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Heading text
    #[serde(default)]
    pub name: String,

    /// Optional free-text note attached below the heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Sibling ordering key (ascending)
    #[serde(default)]
    pub priority: i64,

    /// Opaque service metadata
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RawNode {
    /// Create a node with the given id, parent and name
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            name: name.into(),
            note: None,
            priority: 0,
            metadata: serde_json::Value::Null,
        }
    }

    /// Set the sibling priority
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Parent identifier, treating an empty string as no parent
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|parent| !parent.is_empty())
    }

    /// Whether this node declares no parent
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Heading text with surrounding whitespace removed
    pub fn heading(&self) -> &str {
        self.name.trim()
    }

    /// Note text with surrounding whitespace removed, if non-empty
    pub fn note_text(&self) -> Option<&str> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
    }
}
