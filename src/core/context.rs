//! The view of a single transition handed to guards and handlers.

use super::state::{Code, State};
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::hash::Hash;

/// Bound for transition symbols.
///
/// Symbols are opaque trigger values. The machine stores them as
/// `Option<Y>`, where `None` is the "no symbol" sentinel.
pub trait Symbol: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Symbol for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A `(from, symbol, to)` triple resolved against the state table.
///
/// Guards see it before the machine moves; handlers see it afterwards.
#[derive(Clone, Debug)]
pub struct TransitionContext<'a, C: Code, Y: Symbol> {
    pub from: &'a State<C>,
    pub symbol: Option<&'a Y>,
    pub to: &'a State<C>,
    pub occurred_at: DateTime<Utc>,
}

impl<'a, C: Code, Y: Symbol> TransitionContext<'a, C, Y> {
    pub fn new(from: &'a State<C>, symbol: Option<&'a Y>, to: &'a State<C>) -> Self {
        Self {
            from,
            symbol,
            to,
            occurred_at: Utc::now(),
        }
    }

    /// True when the transition ends the machine's life cycle.
    pub fn reaches_terminal(&self) -> bool {
        self.to.is_terminal()
    }

    /// True for a transition from a state back into itself.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_reports_terminal_destination() {
        let from = State::new(0);
        let to = State::new(1).as_terminal();
        let ctx: TransitionContext<'_, i32, &str> = TransitionContext::new(&from, Some(&"go"), &to);

        assert!(ctx.reaches_terminal());
        assert!(!ctx.is_self_loop());
        assert_eq!(ctx.symbol, Some(&"go"));
    }

    #[test]
    fn self_loop_compares_codes() {
        let from = State::new("idle").with_label("Idle");
        let to = State::new("idle");
        let ctx: TransitionContext<'_, &str, u8> = TransitionContext::new(&from, None, &to);

        assert!(ctx.is_self_loop());
        assert!(ctx.symbol.is_none());
    }
}
