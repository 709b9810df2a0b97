//! Calendar adapter error types

use groundwork_resource::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("calendar API error: {0}")]
    ApiError(String),

    #[error("calendar response is missing the event id")]
    MissingEventId,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalendarError>;

impl From<CalendarError> for ResourceError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::MissingEventId => ResourceError::MissingIdentifier,
            CalendarError::JsonError(e) => ResourceError::Json(e),
            other => ResourceError::ApiError(other.to_string()),
        }
    }
}
