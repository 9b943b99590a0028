//! Decoding of share pages and tree payloads

use crate::error::FetchError;
use crate::html::clean_text;
use dokgraph_domain::RawNode;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static RE_TREE_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PROJECT_TREE_DATA_URL_PARAMS = (\{.*?\});").expect("valid tree params regex")
});

/// Cookie carrying the anonymous session
pub const SESSION_COOKIE: &str = "sessionid";

/// Marker in `metadata.layoutMode` identifying comment nodes
const COMMENT_LAYOUT: &str = "cmnt";

/// Read the session id out of `Set-Cookie` header values
pub fn session_cookie<'a, I>(set_cookie_headers: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    set_cookie_headers.into_iter().find_map(|header| {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        (name.trim() == SESSION_COOKIE && !value.trim().is_empty())
            .then(|| value.trim().to_string())
    })
}

/// Find the share id embedded in a share page
pub fn share_id(html: &str) -> Result<String, FetchError> {
    let params = RE_TREE_PARAMS
        .captures(html)
        .map(|caps| caps[1].to_string())
        .ok_or(FetchError::MissingShareId)?;

    let params: Value = serde_json::from_str(&params)
        .map_err(|e| FetchError::InvalidResponse(format!("share page parameters: {}", e)))?;

    params
        .get("share_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(FetchError::MissingShareId)
}

#[derive(Debug, Deserialize)]
struct TreeData {
    #[serde(default)]
    items: Vec<TreeItem>,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    id: String,
    #[serde(default)]
    prnt: Option<String>,
    #[serde(default)]
    nm: Option<String>,
    #[serde(default)]
    no: Option<String>,
    #[serde(default)]
    pr: Value,
    #[serde(default)]
    metadata: Value,
}

impl TreeItem {
    fn is_comment(&self) -> bool {
        self.metadata
            .get("layoutMode")
            .and_then(Value::as_str)
            .is_some_and(|mode| mode.contains(COMMENT_LAYOUT))
    }

    fn priority(&self) -> i64 {
        self.pr
            .as_i64()
            .or_else(|| self.pr.as_f64().map(|p| p as i64))
            .unwrap_or(0)
    }

    fn into_node(self) -> RawNode {
        let priority = self.priority();
        RawNode {
            id: self.id,
            parent_id: self.prnt,
            name: self.nm.as_deref().map(clean_text).unwrap_or_default(),
            note: self.no.as_deref().map(clean_text),
            priority,
            metadata: self.metadata,
        }
    }
}

/// Decode a `get_tree_data` payload into cleaned outline nodes
///
/// Comment nodes are dropped; names and notes are reduced to plain text.
pub fn tree_nodes(payload: &str) -> Result<Vec<RawNode>, FetchError> {
    let data: TreeData = serde_json::from_str(payload)
        .map_err(|e| FetchError::InvalidResponse(format!("tree data: {}", e)))?;

    Ok(data
        .items
        .into_iter()
        .filter(|item| !item.is_comment())
        .map(TreeItem::into_node)
        .collect())
}
