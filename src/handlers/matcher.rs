//! Exact-or-wildcard patterns over `(from, symbol, to)`.

use crate::core::{Code, Symbol, TransitionContext};

/// Matches one component of a transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Matcher<T> {
    /// Matches every value.
    #[default]
    Any,
    /// Matches values equal to the given one.
    Exact(T),
}

impl<T: PartialEq> Matcher<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Exact(expected) => expected == value,
        }
    }
}

/// A `(from, symbol, to)` pattern a handler subscribes to.
///
/// State components compare by code; the symbol compares by raw equality,
/// so `Exact(None)` matches only transitions taken without a symbol while
/// `Any` matches every symbol including none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule<C, Y> {
    pub from: Matcher<C>,
    pub symbol: Matcher<Option<Y>>,
    pub to: Matcher<C>,
}

impl<C: Code, Y: Symbol> Rule<C, Y> {
    /// The rule matching every transition.
    pub fn any() -> Self {
        Self {
            from: Matcher::Any,
            symbol: Matcher::Any,
            to: Matcher::Any,
        }
    }

    pub fn from(mut self, code: C) -> Self {
        self.from = Matcher::Exact(code);
        self
    }

    pub fn on(mut self, symbol: impl Into<Option<Y>>) -> Self {
        self.symbol = Matcher::Exact(symbol.into());
        self
    }

    pub fn to(mut self, code: C) -> Self {
        self.to = Matcher::Exact(code);
        self
    }

    pub fn matches(&self, context: &TransitionContext<'_, C, Y>) -> bool {
        self.from.matches(&context.from.code)
            && self.to.matches(&context.to.code)
            && match &self.symbol {
                Matcher::Any => true,
                Matcher::Exact(expected) => expected.as_ref() == context.symbol,
            }
    }
}

impl<C: Code, Y: Symbol> Default for Rule<C, Y> {
    fn default() -> Self {
        Self::any()
    }
}
