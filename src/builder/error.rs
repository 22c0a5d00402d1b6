//! Errors loading a transition spec from an external document.

use thiserror::Error;

/// Errors that can occur when reading a [`SpecDocument`](super::SpecDocument).
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Spec document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Spec document declares no transitions")]
    NoTransitions,
}
