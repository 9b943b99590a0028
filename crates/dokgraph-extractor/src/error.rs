//! Error types for the Extractor

use thiserror::Error;

/// Structural problems that make an outline impossible to reconstruct
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A node is its own transitive parent
    #[error("Cycle detected in outline at node '{0}'")]
    Cycle(String),

    /// Two nodes share one identifier
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    /// A node sits deeper below its root than an outline may nest
    #[error("Outline nests deeper than {max} levels at node '{id}'")]
    DepthExceeded {
        /// First node found beyond the limit
        id: String,
        /// The nesting limit
        max: usize,
    },
}
