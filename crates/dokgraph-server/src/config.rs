//! Configuration file parsing for the server.
//!
//! Settings come from an optional TOML file; environment variables
//! override individual fields afterwards.

use dokgraph_analyzer::AnalyzerConfig;
use dokgraph_fetch::FetchConfig;
use dokgraph_llm::GroqConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `bind_address`
pub const ENV_BIND_ADDRESS: &str = "DOKGRAPH_BIND_ADDRESS";
/// Environment variable overriding `bind_port`
pub const ENV_BIND_PORT: &str = "DOKGRAPH_BIND_PORT";
/// Environment variable overriding `storage.backend`
pub const ENV_STORAGE: &str = "DOKGRAPH_STORAGE";
/// Environment variable overriding `storage.path`
pub const ENV_STORAGE_PATH: &str = "DOKGRAPH_STORAGE_PATH";
/// Environment variable overriding `model.api_key`
pub const ENV_API_KEY: &str = "GROQ_API_KEY";
/// Environment variable overriding `model.model`
pub const ENV_MODEL: &str = "GROQ_MODEL";
/// Environment variable overriding `model.base_url`
pub const ENV_MODEL_BASE_URL: &str = "GROQ_BASE_URL";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Single JSON file
    Json,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "json" => Ok(StorageBackend::Json),
            other => Err(ConfigError::Invalid(format!(
                "unknown storage backend '{}' (expected sqlite or json)",
                other
            ))),
        }
    }
}

/// Where documents are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageBackend,

    /// Database or JSON file location; `:memory:` selects an in-memory SQLite store
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: PathBuf::from("dokgraph.db"),
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8001)
    pub bind_port: u16,

    /// Document storage
    pub storage: StorageConfig,

    /// Connection analysis
    pub analyzer: AnalyzerConfig,

    /// Model endpoint
    pub model: GroqConfig,

    /// Shared outline fetching
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8001,
            storage: StorageConfig::default(),
            analyzer: AnalyzerConfig::default(),
            model: GroqConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from an optional file, apply process environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment-style lookups
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(address) = get(ENV_BIND_ADDRESS) {
            self.bind_address = address;
        }
        if let Some(port) = get(ENV_BIND_PORT) {
            self.bind_port = port.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a port number: {}", ENV_BIND_PORT, port))
            })?;
        }
        if let Some(backend) = get(ENV_STORAGE) {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = get(ENV_STORAGE_PATH) {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.model.api_key = Some(key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model.model = model;
        }
        if let Some(base_url) = get(ENV_MODEL_BASE_URL) {
            self.model.base_url = base_url;
        }

        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address must not be empty".to_string()));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.path must not be empty".to_string()));
        }
        self.analyzer
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("analyzer: {}", e)))?;
        self.model
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("model: {}", e)))?;
        self.fetch
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("fetch: {}", e)))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
