//! Statekeeper: a declarative, table-driven state machine engine
//!
//! A machine is declared as a mapping of states to symbols to destination
//! states. Statekeeper derives a validated state table from that mapping,
//! executes symbol-driven transitions, and notifies handlers subscribed to
//! specific transitions.
//!
//! # Core Concepts
//!
//! - **State**: A code plus optional label and initial/terminal flags,
//!   equal to its bare code
//! - **StateTable**: Every state of a definition, with the initial state and
//!   terminals deduced when not declared
//! - **Definition**: A spec, its memoized table, a guard and handlers,
//!   optionally extending a parent definition
//! - **Machine**: One entity's current state, moved by `transition(symbol)`
//!
//! # Example
//!
//! ```rust
//! use statekeeper::builder::Definition;
//! use statekeeper::core::State;
//! use statekeeper::engine::Machine;
//! use statekeeper::transitions;
//! use serde_json::json;
//!
//! let definition = Definition::<&str, &str>::builder("approval")
//!     .transitions(transitions! {
//!         State::new("initial").with_label("Submitted") => {
//!             "success" => "accepted",
//!             "fail" => "denied",
//!         },
//!         "accepted" => { "fail" => "denied" },
//!     })
//!     .build();
//!
//! definition
//!     .subscribe()
//!     .to("denied")
//!     .register("send_failure_notice", |_machine, ctx| {
//!         Ok(json!(format!("denied after {}", ctx.from)))
//!     });
//!
//! let mut machine = Machine::new(definition).unwrap();
//! let results = machine.transition("fail").unwrap();
//!
//! assert_eq!(results[0].outcome, Ok(json!("denied after Submitted (initial)")));
//! assert!(machine.transition("fail").is_err());
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod handlers;

// Re-export commonly used types
pub use builder::{Definition, DefinitionBuilder, SpecDocument};
pub use self::core::{ConfigError, Guard, State, StateTable, TransitionContext, TransitionSpec};
pub use engine::{Machine, TransitionError};
pub use handlers::{Dispatched, HandlerError, HandlerId, HandlerResult, Matcher, Rule};
