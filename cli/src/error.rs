//! Error types for the ui-rag command line.

use thiserror::Error;
use ui_rag_core::RagError;

/// Errors that can end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Rag(#[from] RagError),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 invalid parameters, 3 unknown document, 4 timeout, 1 anything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rag(err) if err.is_validation() => 2,
            CliError::Rag(err) if err.is_not_found() => 3,
            CliError::Timeout(_) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
