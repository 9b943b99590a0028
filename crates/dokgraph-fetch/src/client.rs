//! HTTP client for shared outline links

use crate::error::FetchError;
use crate::payload::{session_cookie, share_id, tree_nodes, SESSION_COOKIE};
use async_trait::async_trait;
use dokgraph_domain::traits::NodeSource;
use dokgraph_domain::RawNode;
use reqwest::header::{COOKIE, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Host of the outline service
pub const DEFAULT_BASE_URL: &str = "https://workflowy.com";

/// Substring every shared outline link carries
pub const SHARE_MARKER: &str = "workflowy.com/s/";

/// Fetch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL requests are sent to
    pub base_url: String,

    /// Timeout for each request (seconds)
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("base_url must be an http(s) URL: {}", self.base_url));
        }
        Ok(())
    }
}

/// Reject anything that is not a shared outline link
pub fn validate_share_url(url: &str) -> Result<(), FetchError> {
    if url.contains(SHARE_MARKER) {
        Ok(())
    } else {
        Err(FetchError::InvalidUrl(url.to_string()))
    }
}

/// Path and query of a share link, starting at `/s/`
fn share_path(url: &str) -> Result<&str, FetchError> {
    let marker = url
        .find(SHARE_MARKER)
        .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
    Ok(&url[marker + SHARE_MARKER.len() - "/s/".len()..])
}

/// Credentials obtained from a share page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSession {
    /// Anonymous session cookie value
    pub session_id: String,

    /// Identifier of the shared subtree
    pub share_id: String,
}

/// Fetches shared outlines as flat node lists
///
/// Fetching is a two-step handshake: the share page yields a session
/// cookie and a share id, which together unlock the tree payload.
#[derive(Debug, Clone)]
pub struct WorkflowyClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl WorkflowyClient {
    /// Create a client
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        config.validate().map_err(FetchError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Load the share page and read its session and share id
    pub async fn open_share(&self, url: &str) -> Result<ShareSession, FetchError> {
        let page_url = self.endpoint(share_path(url)?);
        debug!(url = %page_url, "loading share page");

        let response = self.client.get(&page_url).send().await?.error_for_status()?;

        let session_id = session_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        )
        .ok_or(FetchError::MissingSession)?;

        let html = response.text().await?;
        let share_id = share_id(&html)?;

        Ok(ShareSession {
            session_id,
            share_id,
        })
    }

    /// Download the tree behind an opened share
    pub async fn tree(&self, session: &ShareSession) -> Result<Vec<RawNode>, FetchError> {
        let payload = self
            .client
            .get(self.endpoint("/get_tree_data/"))
            .query(&[("share_id", session.share_id.as_str())])
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, session.session_id))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        tree_nodes(&payload)
    }
}

#[async_trait]
impl NodeSource for WorkflowyClient {
    type Error = FetchError;

    async fn fetch(&self, url: &str) -> Result<Vec<RawNode>, Self::Error> {
        validate_share_url(url)?;

        let session = self.open_share(url).await?;
        let nodes = self.tree(&session).await?;

        info!(share_id = %session.share_id, nodes = nodes.len(), "fetched shared outline");
        Ok(nodes)
    }
}
