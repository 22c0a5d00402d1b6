//! Transition handlers.
//!
//! Handlers subscribe to a `(from, symbol, to)` pattern on one machine
//! definition. After a transition succeeds, every handler whose pattern
//! matches is invoked; a child definition also runs the handlers of its
//! ancestors. A failing handler is logged and recorded, never propagated.

mod dispatch;
mod error;
mod matcher;
mod registry;

pub(crate) use dispatch::dispatch;
pub use dispatch::Dispatched;
pub use error::HandlerError;
pub use matcher::{Matcher, Rule};
pub use registry::{Handler, HandlerId, HandlerRegistry, HandlerResult, Registered};
