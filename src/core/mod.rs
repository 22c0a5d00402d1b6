//! Core state machine types and logic.
//!
//! This module contains the pure part of the engine:
//! - The `State` value type and its merge rules
//! - The raw `TransitionSpec` and the `StateTable` derived from it
//! - Guard predicates and the transition context they inspect
//!
//! Nothing here mutates a running machine; that lives in `engine`.

mod context;
mod error;
mod guard;
mod spec;
mod state;
mod table;

pub use context::{Symbol, TransitionContext};
pub use error::{ConfigError, MergeError};
pub use guard::Guard;
pub use spec::{Outgoing, SourceEntry, TransitionSpec};
pub use state::{Code, State};
pub use table::StateTable;
