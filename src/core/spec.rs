//! The raw transition specification a machine definition is built from.

use super::context::Symbol;
use super::state::{Code, State};

/// One source declaration and its outgoing transitions.
#[derive(Clone, Debug)]
pub struct SourceEntry<C: Code, Y: Symbol> {
    pub state: State<C>,
    pub transitions: Vec<(Option<Y>, State<C>)>,
}

/// Source state → symbol → destination state.
///
/// States may be given as bare codes or as full [`State`] declarations
/// carrying a label and initial/terminal flags; every mention of a code is
/// merged when the state table is built. A `None` symbol is the "no symbol"
/// trigger.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::{State, TransitionSpec};
///
/// let spec: TransitionSpec<i32, &str> = TransitionSpec::new()
///     .from(State::new(0).with_label("initial"), |t| {
///         t.on("success", State::new(1).with_label("accepted")).on("fail", 2)
///     })
///     .from(1, |t| t.on_none(2));
///
/// assert_eq!(spec.entries().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionSpec<C: Code, Y: Symbol> {
    entries: Vec<SourceEntry<C, Y>>,
}

impl<C: Code, Y: Symbol> TransitionSpec<C, Y> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare a source state and its outgoing transitions.
    ///
    /// Declaring the same source again adds to its transitions; a repeated
    /// symbol takes the later destination.
    pub fn from<F>(mut self, source: impl Into<State<C>>, transitions: F) -> Self
    where
        F: FnOnce(Outgoing<C, Y>) -> Outgoing<C, Y>,
    {
        let outgoing = transitions(Outgoing::default());
        self.entries.push(SourceEntry {
            state: source.into(),
            transitions: outgoing.transitions,
        });
        self
    }

    /// Add a single transition.
    pub fn edge(
        self,
        source: impl Into<State<C>>,
        symbol: impl Into<Option<Y>>,
        destination: impl Into<State<C>>,
    ) -> Self {
        self.from(source, |t| t.on(symbol, destination))
    }

    pub fn entries(&self) -> &[SourceEntry<C, Y>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Code, Y: Symbol> Default for TransitionSpec<C, Y> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outgoing transitions of one source, collected by [`TransitionSpec::from`].
#[derive(Clone, Debug)]
pub struct Outgoing<C: Code, Y: Symbol> {
    transitions: Vec<(Option<Y>, State<C>)>,
}

impl<C: Code, Y: Symbol> Outgoing<C, Y> {
    /// Move to `destination` on `symbol`.
    pub fn on(mut self, symbol: impl Into<Option<Y>>, destination: impl Into<State<C>>) -> Self {
        self.transitions.push((symbol.into(), destination.into()));
        self
    }

    /// Move to `destination` when transitioning without a symbol.
    pub fn on_none(mut self, destination: impl Into<State<C>>) -> Self {
        self.transitions.push((None, destination.into()));
        self
    }
}

impl<C: Code, Y: Symbol> Default for Outgoing<C, Y> {
    fn default() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }
}
