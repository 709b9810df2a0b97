//! Lifecycle operation error types

use thiserror::Error;

/// Errors surfaced by `create`/`update`/`delete` lifecycle operations.
///
/// Input validation does not live here: `check` reports missing fields as
/// data, never as an error.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("command exited with status {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("remote response is missing the expected identifier field")]
    MissingIdentifier,

    #[error("required tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
