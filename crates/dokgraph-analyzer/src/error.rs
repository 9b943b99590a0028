//! Error types for the Analyzer

use thiserror::Error;

/// Errors that can occur while setting up connection analysis
///
/// Analysis itself never fails: unusable model replies degrade to
/// "no connection" for the affected item.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
