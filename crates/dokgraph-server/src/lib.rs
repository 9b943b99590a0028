//! Dokgraph Server
//!
//! HTTP surface over extraction, storage and connection analysis.
//!
//! # Endpoints
//!
//! - `POST /extract` `{url}`: fetch a shared outline, extract and save it
//! - `GET /items`: document summaries, newest first
//! - `GET /items/:id`: a document with its cached connections
//! - `DELETE /items/:id`
//! - `POST /items/:id/analyze?force=bool`: cached or freshly inferred connections
//! - `GET /health`

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod service;

use config::{ServerConfig, StorageBackend, StorageConfig};
use dokgraph_analyzer::ConnectionAnalyzer;
use dokgraph_fetch::WorkflowyClient;
use dokgraph_llm::{GroqProvider, LlmError};
use dokgraph_store::{JsonFileStore, SqliteStore};
use handlers::{create_router, AppState};
use service::{BoxedStore, DocumentService};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::{AppError, ServerError};

/// Open the configured storage backend
pub fn open_store(config: &StorageConfig) -> Result<BoxedStore, ServerError> {
    let store: BoxedStore = match config.backend {
        StorageBackend::Sqlite => Box::new(SqliteStore::new(&config.path)?),
        StorageBackend::Json => Box::new(JsonFileStore::open(&config.path)?),
    };
    Ok(store)
}

/// Build the analyzer, or `None` when no API key is configured
pub fn build_analyzer(
    config: &ServerConfig,
) -> Result<Option<ConnectionAnalyzer<GroqProvider>>, ServerError> {
    let provider = match GroqProvider::new(config.model.clone()) {
        Ok(provider) => provider,
        Err(LlmError::MissingApiKey(var)) => {
            warn!("{} is not set; connection analysis is disabled", var);
            return Ok(None);
        }
        Err(e) => return Err(ServerError::Analyzer(e.to_string())),
    };

    let model = provider.model().to_string();
    let analyzer = ConnectionAnalyzer::new(provider, config.analyzer.clone())
        .map_err(|e| ServerError::Analyzer(e.to_string()))?;

    info!(
        model = %model,
        max_concurrent_requests = analyzer.config().max_concurrent_requests,
        max_connections_per_node = analyzer.config().max_connections_per_node,
        "connection analysis enabled"
    );
    Ok(Some(analyzer))
}

/// Wire storage, fetching and analysis into application state
pub fn build_state(config: &ServerConfig) -> Result<AppState<GroqProvider>, ServerError> {
    let store = open_store(&config.storage)?;
    let source = Arc::new(WorkflowyClient::new(config.fetch.clone())?);
    let analyzer = build_analyzer(config)?;

    Ok(AppState {
        service: Arc::new(DocumentService::new(store, source, analyzer)),
    })
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting dokgraph server");
    info!(
        backend = ?config.storage.backend,
        path = %config.storage.path.display(),
        "storage"
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
