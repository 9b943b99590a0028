//! Error types for the server

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use dokgraph_extractor::StructureError;
use dokgraph_fetch::FetchError;
use dokgraph_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup error
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Fetch client could not be built
    #[error("Fetch client error: {0}")]
    Fetch(#[from] FetchError),

    /// Model provider or analyzer could not be built
    #[error("Analyzer error: {0}")]
    Analyzer(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Request-level error type
#[derive(Debug, Error)]
pub enum AppError {
    /// The URL is not a shared outline link
    #[error("{0}")]
    InvalidUrl(String),

    /// The outline could not be fetched
    #[error("{0}")]
    Fetch(String),

    /// The outline does not form a tree
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// No document with this id
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The document has no tier items
    #[error("No DOK sections found to analyze")]
    NothingToAnalyze,

    /// No model provider is configured
    #[error("Connection analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        if e.is_input_error() {
            AppError::InvalidUrl(e.to_string())
        } else {
            AppError::Fetch(e.to_string())
        }
    }
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::NothingToAnalyze => StatusCode::BAD_REQUEST,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::Structure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AnalysisUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(FetchError::InvalidUrl("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(FetchError::MissingSession).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(StructureError::Cycle("a".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::AnalysisUnavailable("no key".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
