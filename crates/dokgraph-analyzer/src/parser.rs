//! Parse model replies into connection candidates
//!
//! Replies are free text. Reasoning blocks and code fences are stripped
//! before the first JSON object is read and validated against the item
//! indices that were offered to the model.

use dokgraph_domain::ConnectionKind;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("reasoning block pattern is valid")
});

/// One candidate picked by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the lower-tier item
    pub id: u32,

    /// Declared relationship
    pub kind: ConnectionKind,
}

/// Why a reply could not be turned into a candidate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFailure {
    /// Reply had no JSON object after cleanup
    #[error("no JSON object in reply")]
    NoJson,

    /// JSON could not be decoded
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Object has no `connections` list
    #[error("reply has no connections list")]
    MissingConnections,

    /// Every listed connection was unusable
    #[error("no usable connection: {0}")]
    Rejected(String),
}

/// Strip reasoning blocks and code fences from a raw reply
///
/// Only closed reasoning blocks are removed. An opening tag that is never
/// closed stays in the text, so a JSON object after it can still be found.
pub fn sanitize(reply: &str) -> String {
    let mut content = REASONING_BLOCK
        .replace_all(reply.trim(), "")
        .trim()
        .to_string();

    if content.starts_with("```") {
        if let Some(inner) = content.split("```").nth(1) {
            content = inner
                .strip_prefix("json")
                .unwrap_or(inner)
                .trim()
                .to_string();
        }
    }

    content
}

/// Read the first JSON object out of sanitized text
///
/// Text after the object is ignored.
fn first_object(content: &str) -> Result<Value, ParseFailure> {
    let start = content.find('{').ok_or(ParseFailure::NoJson)?;
    let mut stream = serde_json::Deserializer::from_str(&content[start..]).into_iter::<Value>();

    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ParseFailure::InvalidJson(e.to_string())),
        None => Err(ParseFailure::NoJson),
    }
}

/// Parse a raw reply into at most one candidate
///
/// Returns `Ok(None)` when the reply is empty or lists no connections.
/// Connections whose id is not in `valid` or whose type is unrecognised
/// are skipped; a missing type reads as `supports`.
pub fn parse_reply(reply: &str, valid: &HashSet<u32>) -> Result<Option<Candidate>, ParseFailure> {
    let content = sanitize(reply);
    if content.is_empty() {
        return Ok(None);
    }

    let json = first_object(&content)?;
    let connections = json
        .get("connections")
        .and_then(Value::as_array)
        .ok_or(ParseFailure::MissingConnections)?;

    if connections.is_empty() {
        return Ok(None);
    }

    let mut first_rejection = None;
    for entry in connections {
        match candidate_from(entry, valid) {
            Ok(candidate) => return Ok(Some(candidate)),
            Err(reason) => {
                first_rejection.get_or_insert(reason);
            }
        }
    }

    Err(ParseFailure::Rejected(
        first_rejection.unwrap_or_else(|| "empty entries".to_string()),
    ))
}

fn candidate_from(entry: &Value, valid: &HashSet<u32>) -> Result<Candidate, String> {
    let id = entry
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| format!("id is not an item index: {}", entry))?;

    if !valid.contains(&id) {
        return Err(format!("id {} is not among the offered items", id));
    }

    let kind = match entry.get("type") {
        None | Some(Value::Null) => ConnectionKind::Supports,
        Some(Value::String(kind)) => ConnectionKind::parse(kind)
            .ok_or_else(|| format!("unknown connection type '{}'", kind))?,
        Some(other) => return Err(format!("connection type is not a string: {}", other)),
    };

    Ok(Candidate { id, kind })
}
