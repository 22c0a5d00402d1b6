//! Serde model for transition specs authored outside Rust.
//!
//! A document is a flat list of transitions. Each endpoint is either a bare
//! code or a full state object, so metadata can be declared once and the
//! code referenced everywhere else:
//!
//! ```json
//! { "transitions": [
//!     { "from": {"code": "draft", "label": "Draft"}, "on": "submit", "to": "review" },
//!     { "from": "review", "on": null, "to": {"code": "done", "is_terminal": true} }
//! ] }
//! ```
//!
//! A missing or `null` `on` is the "no symbol" trigger.

use super::error::SpecError;
use crate::core::{Code, State, Symbol, TransitionSpec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A state endpoint: a bare code or a full declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateDecl<C> {
    Code(C),
    State(State<C>),
}

impl<C: Code> From<StateDecl<C>> for State<C> {
    fn from(decl: StateDecl<C>) -> Self {
        match decl {
            StateDecl::Code(code) => State::new(code),
            StateDecl::State(state) => state,
        }
    }
}

impl<C: Code> From<&State<C>> for StateDecl<C> {
    fn from(state: &State<C>) -> Self {
        if state.label.is_none() && state.is_initial.is_none() && state.is_terminal.is_none() {
            StateDecl::Code(state.code.clone())
        } else {
            StateDecl::State(state.clone())
        }
    }
}

/// One `from --on--> to` transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionDecl<C, Y> {
    pub from: StateDecl<C>,
    pub on: Option<Y>,
    pub to: StateDecl<C>,
}

/// A transition spec as a serializable document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpecDocument<C, Y> {
    pub transitions: Vec<TransitionDecl<C, Y>>,
}

impl<C: Code, Y: Symbol> SpecDocument<C, Y> {
    /// Convert into a spec, preserving declaration order.
    pub fn into_spec(self) -> Result<TransitionSpec<C, Y>, SpecError> {
        if self.transitions.is_empty() {
            return Err(SpecError::NoTransitions);
        }
        Ok(self
            .transitions
            .into_iter()
            .fold(TransitionSpec::new(), |spec, decl| {
                spec.edge(State::from(decl.from), decl.on, State::from(decl.to))
            }))
    }
}

impl<C: Code, Y: Symbol> From<&TransitionSpec<C, Y>> for SpecDocument<C, Y> {
    fn from(spec: &TransitionSpec<C, Y>) -> Self {
        let transitions = spec
            .entries()
            .iter()
            .flat_map(|entry| {
                entry
                    .transitions
                    .iter()
                    .map(move |(symbol, to)| TransitionDecl {
                        from: StateDecl::from(&entry.state),
                        on: symbol.clone(),
                        to: StateDecl::from(to),
                    })
            })
            .collect();
        SpecDocument { transitions }
    }
}

impl<C, Y> TransitionSpec<C, Y>
where
    C: Code + DeserializeOwned,
    Y: Symbol + DeserializeOwned,
{
    /// Parse a JSON [`SpecDocument`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use statekeeper::core::{StateTable, TransitionSpec};
    ///
    /// let spec: TransitionSpec<String, String> = TransitionSpec::from_json(r#"{
    ///     "transitions": [
    ///         {"from": {"code": "draft", "label": "Draft"}, "on": "submit", "to": "review"},
    ///         {"from": "review", "on": "approve", "to": "done"}
    ///     ]
    /// }"#).unwrap();
    ///
    /// let table = StateTable::build(&spec).unwrap();
    /// assert_eq!(table.initial(), &"draft".to_string());
    /// assert_eq!(table.initial().label.as_deref(), Some("Draft"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let document: SpecDocument<C, Y> = serde_json::from_str(json)?;
        document.into_spec()
    }
}
