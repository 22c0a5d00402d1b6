//! Invoking matched handlers and collecting their outcomes.

use super::error::HandlerError;
use super::registry::{HandlerId, HandlerResult, Registered};
use crate::core::{Code, Symbol, TransitionContext};
use crate::engine::Machine;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Outcome of one handler invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatched {
    pub handler: HandlerId,
    pub name: String,
    pub outcome: HandlerResult,
}

impl Dispatched {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run every handler in order.
///
/// A handler returning an error or panicking is logged and recorded as its
/// outcome; the remaining handlers still run.
pub(crate) fn dispatch<C: Code, Y: Symbol>(
    handlers: Vec<Registered<C, Y>>,
    machine: &Machine<C, Y>,
    context: &TransitionContext<'_, C, Y>,
) -> Vec<Dispatched> {
    handlers
        .into_iter()
        .map(|registered| {
            let call = AssertUnwindSafe(|| (registered.handler)(machine, context));
            let outcome = match panic::catch_unwind(call) {
                Ok(result) => result,
                Err(payload) => Err(HandlerError::Panicked(panic_message(payload))),
            };

            if let Err(err) = &outcome {
                tracing::error!(
                    handler = %registered.name,
                    id = %registered.id,
                    from = ?context.from.code,
                    symbol = ?context.symbol,
                    to = ?context.to.code,
                    error = %err,
                    "error in transition handler"
                );
            }

            Dispatched {
                handler: registered.id,
                name: registered.name,
                outcome,
            }
        })
        .collect()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
