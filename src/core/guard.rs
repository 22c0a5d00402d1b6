//! Guard predicates for vetoing transitions.
//!
//! A guard runs after the destination has been resolved from the state
//! table and before the machine moves. Returning `false` turns an otherwise
//! valid transition into an illegal one.

use super::context::{Symbol, TransitionContext};
use super::state::Code;
use std::sync::Arc;

/// Predicate that decides whether a resolved transition may execute.
///
/// Guards receive full `State` values rather than raw codes, so they can
/// inspect labels and flags.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::{Guard, State, TransitionContext};
///
/// // Never leave a terminal state, never skip straight to one.
/// let guard: Guard<&str, &str> = Guard::new(|ctx| !ctx.from.is_terminal() && !ctx.reaches_terminal());
///
/// let draft = State::new("draft");
/// let review = State::new("review");
/// let done = State::new("done").as_terminal();
///
/// assert!(guard.check(&TransitionContext::new(&draft, Some(&"submit"), &review)));
/// assert!(!guard.check(&TransitionContext::new(&draft, Some(&"skip"), &done)));
/// ```
pub struct Guard<C: Code, Y: Symbol> {
    predicate: Arc<dyn Fn(&TransitionContext<'_, C, Y>) -> bool + Send + Sync>,
}

impl<C: Code, Y: Symbol> Guard<C, Y> {
    /// Create a guard from a predicate.
    ///
    /// The predicate should be deterministic; it may run on any thread
    /// holding the definition.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, C, Y>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// A guard that never vetoes.
    pub fn allow_all() -> Self {
        Guard::new(|_| true)
    }

    /// Check if the guard allows this transition.
    pub fn check(&self, context: &TransitionContext<'_, C, Y>) -> bool {
        (self.predicate)(context)
    }
}

impl<C: Code, Y: Symbol> Clone for Guard<C, Y> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C: Code, Y: Symbol> std::fmt::Debug for Guard<C, Y> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
