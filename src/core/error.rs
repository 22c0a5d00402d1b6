//! Configuration errors raised while resolving a transition spec.

use thiserror::Error;

/// The transition spec can't be resolved into a valid state table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("multiple states with code {code} and different {attribute}")]
    ConflictingAttribute { code: String, attribute: &'static str },

    #[error(
        "must define exactly 1 initial state, found {count} ({candidates:?}). \
         Use `State::new(code).as_initial()` to mark one explicitly"
    )]
    InitialStateCount {
        count: usize,
        candidates: Vec<String>,
    },
}

/// Errors from [`State::merge_data`](super::State::merge_data).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MergeError {
    #[error("trying to merge data of unequal states {left} and {right}")]
    CodeMismatch { left: String, right: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
