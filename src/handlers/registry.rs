//! Per-definition handler storage.

use super::error::HandlerError;
use super::matcher::Rule;
use crate::core::{Code, Symbol, TransitionContext};
use crate::engine::Machine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// What a handler returns: any JSON value, or an error.
pub type HandlerResult = Result<serde_json::Value, HandlerError>;

/// A transition observer.
///
/// Receives the machine after it has moved and the transition that moved it.
pub type Handler<C, Y> =
    Arc<dyn Fn(&Machine<C, Y>, &TransitionContext<'_, C, Y>) -> HandlerResult + Send + Sync>;

/// Identifies one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        HandlerId(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A handler together with its identity.
pub struct Registered<C: Code, Y: Symbol> {
    pub id: HandlerId,
    pub name: String,
    pub handler: Handler<C, Y>,
}

impl<C: Code, Y: Symbol> Clone for Registered<C, Y> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C: Code, Y: Symbol> fmt::Debug for Registered<C, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registered")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

struct RuleGroup<C: Code, Y: Symbol> {
    rule: Rule<C, Y>,
    handlers: Vec<Registered<C, Y>>,
}

/// Handlers of a single machine definition, grouped by rule.
///
/// Groups keep registration order. Registering the same rule twice adds to
/// the existing group.
pub struct HandlerRegistry<C: Code, Y: Symbol> {
    groups: RwLock<Vec<RuleGroup<C, Y>>>,
}

impl<C: Code, Y: Symbol> HandlerRegistry<C, Y> {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(Vec::new()),
        }
    }

    /// Store `handler` under `rule`.
    pub fn subscribe<F>(&self, rule: Rule<C, Y>, name: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(&Machine<C, Y>, &TransitionContext<'_, C, Y>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        let registered = Registered {
            id: HandlerId::new(),
            name: name.into(),
            handler: Arc::new(handler),
        };
        let id = registered.id;

        let mut groups = self.groups.write();
        match groups.iter_mut().find(|group| group.rule == rule) {
            Some(group) => group.handlers.push(registered),
            None => groups.push(RuleGroup {
                rule,
                handlers: vec![registered],
            }),
        }
        id
    }

    /// Remove a registration. Returns whether it was found.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut groups = self.groups.write();
        let mut removed = false;
        for group in groups.iter_mut() {
            let before = group.handlers.len();
            group.handlers.retain(|registered| registered.id != id);
            removed |= group.handlers.len() != before;
        }
        groups.retain(|group| !group.handlers.is_empty());
        removed
    }

    /// Snapshot of the handlers whose rule matches `context`, in group order.
    pub fn matching(&self, context: &TransitionContext<'_, C, Y>) -> Vec<Registered<C, Y>> {
        self.groups
            .read()
            .iter()
            .filter(|group| group.rule.matches(context))
            .flat_map(|group| group.handlers.iter().cloned())
            .collect()
    }

    /// The rules with at least one handler.
    pub fn rules(&self) -> Vec<Rule<C, Y>> {
        self.groups
            .read()
            .iter()
            .map(|group| group.rule.clone())
            .collect()
    }

    /// Number of registered handlers across all rules.
    pub fn len(&self) -> usize {
        self.groups.read().iter().map(|group| group.handlers.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: Code, Y: Symbol> Default for HandlerRegistry<C, Y> {
    fn default() -> Self {
        Self::new()
    }
}
