//! Custom error types for the insights layer.

use thiserror::Error;

/// Insights errors.
#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("API error: {0}")]
    Api(#[from] cocofarm_client::FarmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<String> for InsightsError {
    fn from(err: String) -> Self {
        InsightsError::Internal(err)
    }
}

impl From<InsightsError> for String {
    fn from(err: InsightsError) -> Self {
        err.to_string()
    }
}

/// Result type alias for insights operations.
pub type InsightsResult<T> = Result<T, InsightsError>;
