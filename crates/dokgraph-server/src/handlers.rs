//! HTTP request handlers for the document service.
//!
//! Implements extraction, document CRUD, connection analysis and health
//! check endpoints using axum.

use crate::error::AppError;
use crate::service::DocumentService;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, Utc};
use dokgraph_domain::traits::ModelProvider;
use dokgraph_domain::{ConnectionSet, Document, DocumentSummary, StoredDocument};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Shared application state
pub struct AppState<P>
where
    P: ModelProvider,
{
    /// Document workflows
    pub service: Arc<DocumentService<P>>,
}

impl<P: ModelProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Extraction request
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Shared outline link
    pub url: String,
}

/// Extraction result; fetch failures are reported with `success: false`
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Whether the outline was extracted and saved
    pub success: bool,

    /// Id of the saved document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Extracted document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,

    /// Markdown rendering of the whole outline
    #[serde(default)]
    pub raw_markdown: String,

    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    fn saved(record: StoredDocument) -> Self {
        Self {
            success: true,
            document_id: Some(record.id),
            name: Some(record.name),
            document: Some(record.document),
            raw_markdown: record.raw_markdown,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            document_id: None,
            name: None,
            document: None,
            raw_markdown: String::new(),
            error: Some(error),
        }
    }
}

/// A stored document with its cached connections
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentView {
    /// Document id
    pub id: String,
    /// Document title
    pub name: String,
    /// Source link
    pub url: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Extracted document
    pub document: Document,
    /// Cached connections, if analyzed
    pub connections: Option<ConnectionSet>,
}

impl From<StoredDocument> for DocumentView {
    fn from(record: StoredDocument) -> Self {
        Self {
            id: record.id,
            name: record.name,
            url: record.url,
            created_at: record.created_at,
            document: record.document,
            connections: record.connections,
        }
    }
}

/// Deletion acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true; failures are reported as errors
    pub success: bool,
}

/// Analysis options
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    /// Recompute even when connections are cached
    #[serde(default)]
    pub force: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the server answers
    pub status: String,
    /// Whether connection analysis is configured
    pub analysis: bool,
}

/// POST /extract - Fetch, extract and save a shared outline
async fn extract_document<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    match state.service.extract(&request.url).await {
        Ok(record) => Ok(Json(ExtractResponse::saved(record))),
        Err(AppError::Fetch(message)) => {
            warn!(url = %request.url, "extraction failed: {}", message);
            Ok(Json(ExtractResponse::failed(message)))
        }
        Err(e) => Err(e),
    }
}

/// GET /items - List stored documents
async fn list_documents<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    Ok(Json(state.service.list()?))
}

/// GET /items/:id - Get a stored document
async fn get_document<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentView>, AppError> {
    Ok(Json(state.service.get(&id)?.into()))
}

/// DELETE /items/:id - Delete a stored document
async fn delete_document<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.service.delete(&id)?;
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /items/:id/analyze - Infer or return cached connections
async fn analyze_document<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<ConnectionSet>, AppError> {
    Ok(Json(state.service.analyze(&id, params.force).await?))
}

/// GET /health - Liveness check
async fn health_check<P: ModelProvider + 'static>(
    State(state): State<AppState<P>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        analysis: state.service.analysis_enabled(),
    })
}

/// Create the axum router with all routes
pub fn create_router<P: ModelProvider + 'static>(state: AppState<P>) -> AxumRouter {
    AxumRouter::new()
        .route("/extract", post(extract_document::<P>))
        .route("/items", get(list_documents::<P>))
        .route(
            "/items/:id",
            get(get_document::<P>).delete(delete_document::<P>),
        )
        .route("/items/:id/analyze", post(analyze_document::<P>))
        .route("/health", get(health_check::<P>))
        .with_state(state)
}
