//! Errors returned by [`Machine::transition`](super::Machine::transition).

use crate::core::{Code, ConfigError, State, Symbol};
use thiserror::Error;

/// Error type a commit hook may fail with.
pub type CommitError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during a transition.
#[derive(Debug, Error)]
pub enum TransitionError<C: Code, Y: Symbol> {
    /// The current state has no transition for the symbol, the current
    /// state is unknown to the table, or the guard vetoed.
    #[error("illegal transition from {state:?} on {symbol:?}")]
    Illegal {
        state: Option<State<C>>,
        symbol: Option<Y>,
    },

    /// The machine moved in memory but the commit hook failed to record it.
    #[error("failed to commit transition into {state:?}")]
    Commit {
        state: State<C>,
        #[source]
        source: CommitError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl<C: Code, Y: Symbol> TransitionError<C, Y> {
    pub fn is_illegal(&self) -> bool {
        matches!(self, TransitionError::Illegal { .. })
    }
}
