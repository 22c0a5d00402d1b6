//! The imperative shell around the pure core.
//!
//! A [`Machine`] owns the current state code of one entity and executes
//! transitions against its definition's table: lookup, guard, mutation,
//! commit hook, then handler dispatch, all synchronously on the caller's
//! thread.

mod error;
mod machine;

pub use error::{CommitError, TransitionError};
pub use machine::Machine;
