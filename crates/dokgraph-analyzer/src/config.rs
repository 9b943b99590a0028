//! Configuration for the Analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How much of an item's sub-items is shown to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubItemDetail {
    /// Only the number of sub-items
    #[default]
    Count,
    /// The first line of each sub-item, truncated
    Text,
}

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum model calls in flight at once
    pub max_concurrent_requests: usize,

    /// Maximum connections touching one node, applied per side
    pub max_connections_per_node: usize,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Characters of each candidate shown in the numbered list
    pub preview_chars: usize,

    /// Confidence score recorded on every inferred connection
    pub confidence_score: u8,

    /// Sub-item rendering inside prompts
    pub sub_item_detail: SubItemDetail,

    /// Characters kept per sub-item when `sub_item_detail` is `text`
    pub sub_item_text_chars: usize,
}

impl AnalyzerConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".to_string());
        }
        if self.max_connections_per_node == 0 {
            return Err("max_connections_per_node must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.preview_chars == 0 {
            return Err("preview_chars must be greater than 0".to_string());
        }
        if self.confidence_score > 100 {
            return Err("confidence_score cannot exceed 100".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 5,
            max_connections_per_node: 2,
            request_timeout_secs: 30,
            preview_chars: 200,
            confidence_score: 95,
            sub_item_detail: SubItemDetail::Count,
            sub_item_text_chars: 80,
        }
    }
}
