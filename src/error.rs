// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponsiveError {
    /// Caller error at setup: ambiguous fallback size or unusable table values.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ResponsiveError {
    fn from(err: serde_json::Error) -> Self {
        ResponsiveError::Serialization(err.to_string())
    }
}
