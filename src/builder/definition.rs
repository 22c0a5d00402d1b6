//! Machine definitions and their builder.

use crate::core::{
    Code, ConfigError, Guard, State, StateTable, Symbol, TransitionContext, TransitionSpec,
};
use crate::engine::Machine;
use crate::handlers::{
    self, Dispatched, HandlerId, HandlerRegistry, HandlerResult, Registered, Rule,
};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A machine definition: the transition spec, its memoized state table,
/// handlers, an optional guard and an optional parent definition.
///
/// Definitions are shared as `Arc<Definition>`; every [`Machine`] built
/// from one sees the same table and handlers. A child definition created
/// with [`Definition::extend`] inherits the parent's spec and guard unless
/// it sets its own, and runs the parent's handlers in addition to its own.
///
/// # Example
///
/// ```rust
/// use statekeeper::builder::Definition;
/// use statekeeper::core::TransitionSpec;
///
/// let definition = Definition::builder("approval")
///     .transitions(
///         TransitionSpec::<&str, &str>::new()
///             .from("initial", |t| t.on("success", "accepted").on("fail", "denied"))
///             .from("accepted", |t| t.on("fail", "denied")),
///     )
///     .build();
///
/// assert_eq!(definition.initial_state().unwrap(), &"initial");
/// assert_eq!(definition.terminals().unwrap(), vec![&"denied"]);
/// ```
pub struct Definition<C: Code, Y: Symbol> {
    name: String,
    spec: TransitionSpec<C, Y>,
    table: OnceLock<Result<StateTable<C, Y>, ConfigError>>,
    handlers: HandlerRegistry<C, Y>,
    guard: Option<Guard<C, Y>>,
    parent: Option<Arc<Definition<C, Y>>>,
}

impl<C: Code, Y: Symbol> Definition<C, Y> {
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder<C, Y> {
        DefinitionBuilder::new(name)
    }

    /// Start a child definition of `parent`.
    pub fn extend(parent: &Arc<Self>, name: impl Into<String>) -> DefinitionBuilder<C, Y> {
        DefinitionBuilder {
            parent: Some(Arc::clone(parent)),
            ..DefinitionBuilder::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &TransitionSpec<C, Y> {
        &self.spec
    }

    pub fn parent(&self) -> Option<&Arc<Definition<C, Y>>> {
        self.parent.as_ref()
    }

    /// The state table, built on first access and cached for the lifetime
    /// of the definition.
    ///
    /// Concurrent first calls build the table once. A configuration error
    /// is cached as well and returned on every call.
    pub fn states(&self) -> Result<&StateTable<C, Y>, ConfigError> {
        self.table
            .get_or_init(|| {
                let table = StateTable::build(&self.spec);
                match &table {
                    Ok(table) => tracing::debug!(
                        machine = %self.name,
                        states = table.len(),
                        initial = ?table.initial().code,
                        terminals = table.terminals().len(),
                        "built state table"
                    ),
                    Err(err) => tracing::warn!(
                        machine = %self.name,
                        error = %err,
                        "improperly configured state machine"
                    ),
                }
                table
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Build the state table now so configuration errors surface before
    /// any machine exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.states().map(|_| ())
    }

    pub fn initial_state(&self) -> Result<&State<C>, ConfigError> {
        Ok(self.states()?.initial())
    }

    pub fn terminals(&self) -> Result<Vec<&State<C>>, ConfigError> {
        Ok(self.states()?.terminals())
    }

    /// The guard in effect: this definition's, else the nearest ancestor's.
    pub fn guard(&self) -> Option<&Guard<C, Y>> {
        self.guard
            .as_ref()
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.guard()))
    }

    /// Handlers registered on this definition only.
    pub fn handlers(&self) -> &HandlerRegistry<C, Y> {
        &self.handlers
    }

    /// Start a handler registration scoped to this definition.
    ///
    /// Every component of the pattern defaults to the wildcard.
    pub fn subscribe(&self) -> Subscription<'_, C, Y> {
        Subscription {
            registry: &self.handlers,
            rule: Rule::any(),
        }
    }

    /// Handlers matching `context`, ancestors first.
    ///
    /// Walks the parent chain on every call so registrations made on an
    /// ancestor after machines exist are still seen.
    pub fn matching_handlers(&self, context: &TransitionContext<'_, C, Y>) -> Vec<Registered<C, Y>> {
        let mut matching = match &self.parent {
            Some(parent) => parent.matching_handlers(context),
            None => Vec::new(),
        };
        matching.extend(self.handlers.matching(context));
        matching
    }

    /// Invoke every handler matching `context` with `machine`.
    pub fn notify(
        &self,
        machine: &Machine<C, Y>,
        context: &TransitionContext<'_, C, Y>,
    ) -> Vec<Dispatched> {
        handlers::dispatch(self.matching_handlers(context), machine, context)
    }
}

impl<C: Code, Y: Symbol> fmt::Debug for Definition<C, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .field("guarded", &self.guard.is_some())
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .finish_non_exhaustive()
    }
}

/// Builder for [`Definition`].
pub struct DefinitionBuilder<C: Code, Y: Symbol> {
    name: String,
    spec: Option<TransitionSpec<C, Y>>,
    guard: Option<Guard<C, Y>>,
    parent: Option<Arc<Definition<C, Y>>>,
}

impl<C: Code, Y: Symbol> DefinitionBuilder<C, Y> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: None,
            guard: None,
            parent: None,
        }
    }

    /// Set the transition spec. A child definition without one inherits
    /// its parent's.
    pub fn transitions(mut self, spec: TransitionSpec<C, Y>) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Veto transitions with a predicate.
    pub fn guard<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, C, Y>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    pub fn with_guard(mut self, guard: Guard<C, Y>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Build the definition. The state table is built lazily on first use.
    pub fn build(self) -> Arc<Definition<C, Y>> {
        let spec = match (self.spec, &self.parent) {
            (Some(spec), _) => spec,
            (None, Some(parent)) => parent.spec.clone(),
            (None, None) => TransitionSpec::new(),
        };

        Arc::new(Definition {
            name: self.name,
            spec,
            table: OnceLock::new(),
            handlers: HandlerRegistry::new(),
            guard: self.guard,
            parent: self.parent,
        })
    }

    /// Build the definition and its state table, failing on configuration
    /// errors.
    pub fn try_build(self) -> Result<Arc<Definition<C, Y>>, ConfigError> {
        let definition = self.build();
        definition.validate()?;
        Ok(definition)
    }
}

/// Registrar for one handler, returned by [`Definition::subscribe`].
///
/// # Example
///
/// ```rust
/// use statekeeper::builder::Definition;
/// use statekeeper::core::TransitionSpec;
/// use serde_json::json;
///
/// let definition = Definition::builder("approval")
///     .transitions(TransitionSpec::<&str, &str>::new().from("initial", |t| t.on("fail", "denied")))
///     .build();
///
/// definition
///     .subscribe()
///     .to("denied")
///     .register("send_failure_notice", |_machine, ctx| {
///         Ok(json!(format!("left {}", ctx.from.code)))
///     });
///
/// assert_eq!(definition.handlers().len(), 1);
/// ```
pub struct Subscription<'a, C: Code, Y: Symbol> {
    registry: &'a HandlerRegistry<C, Y>,
    rule: Rule<C, Y>,
}

impl<'a, C: Code, Y: Symbol> Subscription<'a, C, Y> {
    pub fn from(mut self, code: C) -> Self {
        self.rule = self.rule.from(code);
        self
    }

    pub fn on(mut self, symbol: impl Into<Option<Y>>) -> Self {
        self.rule = self.rule.on(symbol);
        self
    }

    pub fn to(mut self, code: C) -> Self {
        self.rule = self.rule.to(code);
        self
    }

    pub fn register<F>(self, name: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(&Machine<C, Y>, &TransitionContext<'_, C, Y>) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        self.registry.subscribe(self.rule, name, handler)
    }
}
