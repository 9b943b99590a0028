//! Dokgraph Fetch Layer
//!
//! Implements the `NodeSource` trait for shared WorkFlowy links.
//!
//! # Pipeline
//!
//! ```text
//! share URL → share page (session cookie + share id) → tree payload → RawNode list
//! ```
//!
//! Comment nodes are filtered out and rich text in names and notes is
//! reduced to plain text with markdown links.

#![warn(missing_docs)]

mod client;
mod error;
mod html;
mod payload;

pub use client::{
    validate_share_url, FetchConfig, ShareSession, WorkflowyClient, DEFAULT_BASE_URL,
    SHARE_MARKER,
};
pub use error::FetchError;
pub use html::{clean_text, decode_entities};
pub use payload::{session_cookie, share_id, tree_nodes, SESSION_COOKIE};
