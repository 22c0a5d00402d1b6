//! Handler outcome errors.

use thiserror::Error;

/// Why a handler did not produce a value.
///
/// Handler failures never abort a transition; they are recorded as the
/// handler's outcome in the dispatch results.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn failed(message: impl std::fmt::Display) -> Self {
        HandlerError::Failed(message.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Failed(err.to_string())
    }
}
