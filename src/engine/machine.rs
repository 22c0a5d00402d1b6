//! Machine instances that execute transitions.

use super::error::{CommitError, TransitionError};
use crate::builder::Definition;
use crate::core::{Code, ConfigError, Guard, State, StateTable, Symbol, TransitionContext};
use crate::handlers::Dispatched;
use std::fmt;
use std::sync::Arc;

type CommitHook<C> = Box<dyn FnMut(&C) -> Result<(), CommitError> + Send>;

/// A running instance of a [`Definition`].
///
/// Holds exactly one piece of mutable state, the current state code. The
/// definition supplies the table, guard and handlers; the embedding system
/// supplies a commit hook to make each new state durable.
///
/// # Example
///
/// ```rust
/// use statekeeper::builder::Definition;
/// use statekeeper::engine::Machine;
/// use statekeeper::transitions;
///
/// let definition = Definition::<i32, &str>::builder("example")
///     .transitions(transitions! {
///         0 => { "go" => 1, "skip" => 2 },
///         1 => { "done" => 2 },
///     })
///     .build();
///
/// let mut machine = Machine::new(definition).unwrap();
/// assert_eq!(machine.current_state_code(), Some(&0));
///
/// machine.transition("go").unwrap();
/// machine.transition("done").unwrap();
/// assert!(machine.is_terminal());
/// assert!(machine.transition("go").is_err());
/// ```
pub struct Machine<C: Code, Y: Symbol> {
    definition: Arc<Definition<C, Y>>,
    current_state_code: Option<C>,
    commit: CommitHook<C>,
    guard: Option<Guard<C, Y>>,
}

impl<C: Code, Y: Symbol> Machine<C, Y> {
    /// Create a machine in the definition's initial state.
    pub fn new(definition: Arc<Definition<C, Y>>) -> Result<Self, ConfigError> {
        Self::resume(definition, None)
    }

    /// Create a machine around a previously stored state code.
    ///
    /// `None` starts from the initial state. A code the table doesn't know
    /// is kept as-is; every transition from it is illegal.
    pub fn resume(
        definition: Arc<Definition<C, Y>>,
        current_state_code: Option<C>,
    ) -> Result<Self, ConfigError> {
        let current_state_code = match current_state_code {
            Some(code) => code,
            None => definition.initial_state()?.code.clone(),
        };

        Ok(Self {
            definition,
            current_state_code: Some(current_state_code),
            commit: Box::new(|_| Ok(())),
            guard: None,
        })
    }

    /// Call `commit` with the new code after every accepted transition.
    pub fn with_commit<F>(mut self, commit: F) -> Self
    where
        F: FnMut(&C) -> Result<(), CommitError> + Send + 'static,
    {
        self.commit = Box::new(commit);
        self
    }

    /// Use `guard` instead of the definition's guard.
    pub fn with_guard(mut self, guard: Guard<C, Y>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn definition(&self) -> &Arc<Definition<C, Y>> {
        &self.definition
    }

    pub fn current_state_code(&self) -> Option<&C> {
        self.current_state_code.as_ref()
    }

    /// The current code as a `State`, or `None` if the table doesn't know it.
    pub fn current_state(&self) -> Option<&State<C>> {
        self.states()?.get(self.current_state_code.as_ref()?)
    }

    /// The definition's state table.
    pub fn states(&self) -> Option<&StateTable<C, Y>> {
        // A machine only exists once its definition built a table.
        self.definition.states().ok()
    }

    pub fn is_terminal(&self) -> bool {
        self.current_state().is_some_and(State::is_terminal)
    }

    /// Where `symbol` would lead from the current state, ignoring the guard.
    pub fn next_state(&self, symbol: impl Into<Option<Y>>) -> Option<&State<C>> {
        let symbol = symbol.into();
        self.states()?.next(self.current_state_code.as_ref()?, &symbol)
    }

    /// Symbols defined for the current state, in declaration order.
    pub fn available_symbols(&self) -> Vec<Option<&Y>> {
        match (self.states(), self.current_state_code.as_ref()) {
            (Some(table), Some(code)) => table.symbols(code),
            _ => Vec::new(),
        }
    }

    /// Transition into the next state according to `symbol`.
    ///
    /// On success the current state code is updated, the commit hook runs,
    /// and every matching handler is invoked. Returns each handler's outcome
    /// in dispatch order; a failing handler never fails the transition.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::Illegal`] if the current state has no
    ///   transition for `symbol` or the guard vetoes it. The state is left
    ///   unchanged.
    /// - [`TransitionError::Commit`] if the commit hook fails. The machine
    ///   has already moved in memory and is not rolled back; handlers are
    ///   not invoked.
    pub fn transition(
        &mut self,
        symbol: impl Into<Option<Y>>,
    ) -> Result<Vec<Dispatched>, TransitionError<C, Y>> {
        let symbol = symbol.into();
        let definition = Arc::clone(&self.definition);
        let table = definition.states()?;

        let current = self
            .current_state_code
            .as_ref()
            .and_then(|code| table.get(code));
        let Some((from, to)) =
            current.and_then(|from| table.next(&from.code, &symbol).map(|to| (from, to)))
        else {
            tracing::warn!(
                machine = %definition.name(),
                state = ?self.current_state_code,
                symbol = ?symbol,
                "no transition defined"
            );
            return Err(TransitionError::Illegal {
                state: current.cloned(),
                symbol,
            });
        };

        let context = TransitionContext::new(from, symbol.as_ref(), to);
        let guard = self.guard.as_ref().or_else(|| definition.guard());
        if !guard.map_or(true, |guard| guard.check(&context)) {
            tracing::warn!(
                machine = %definition.name(),
                from = ?from.code,
                symbol = ?symbol,
                to = ?to.code,
                "transition vetoed by guard"
            );
            return Err(TransitionError::Illegal {
                state: Some(from.clone()),
                symbol: symbol.clone(),
            });
        }

        self.current_state_code = Some(to.code.clone());
        tracing::debug!(
            machine = %definition.name(),
            from = ?from.code,
            symbol = ?symbol,
            to = ?to.code,
            "transition applied"
        );

        if let Err(source) = (self.commit)(&to.code) {
            tracing::error!(
                machine = %definition.name(),
                state = ?to.code,
                error = %source,
                "failed to commit transition"
            );
            return Err(TransitionError::Commit {
                state: to.clone(),
                source,
            });
        }

        Ok(definition.notify(self, &context))
    }
}

impl<C: Code, Y: Symbol> fmt::Debug for Machine<C, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("definition", &self.definition.name())
            .field("current_state_code", &self.current_state_code)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn definition() -> Arc<Definition<i32, &'static str>> {
        Definition::builder("example")
            .transitions(transitions! {
                0 => { "go" => 1, "skip" => 2 },
                1 => { "done" => 2 },
            })
            .build()
    }

    #[test]
    fn starts_in_initial_state() {
        let machine = Machine::new(definition()).unwrap();

        assert_eq!(machine.current_state_code(), Some(&0));
        assert_eq!(machine.current_state(), Some(&State::new(0)));
        assert!(!machine.is_terminal());
    }

    #[test]
    fn walks_to_terminal_state() {
        let mut machine = Machine::new(definition()).unwrap();

        machine.transition("go").unwrap();
        assert_eq!(machine.current_state_code(), Some(&1));
        machine.transition("done").unwrap();
        assert_eq!(machine.current_state_code(), Some(&2));
        assert!(machine.is_terminal());

        let err = machine.transition("go").unwrap_err();
        assert!(err.is_illegal());
    }

    #[test]
    fn undefined_symbol_leaves_state_unchanged() {
        let mut machine = Machine::new(definition()).unwrap();

        let err = machine.transition("done").unwrap_err();
        match err {
            TransitionError::Illegal { state, symbol } => {
                assert_eq!(state, Some(State::new(0)));
                assert_eq!(symbol, Some("done"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(machine.current_state_code(), Some(&0));
    }

    #[test]
    fn unknown_current_state_is_illegal() {
        let mut machine = Machine::resume(definition(), Some(99)).unwrap();

        assert_eq!(machine.current_state(), None);
        let err = machine.transition("go").unwrap_err();
        assert!(matches!(err, TransitionError::Illegal { state: None, .. }));
        assert_eq!(machine.current_state_code(), Some(&99));
    }

    #[test]
    fn resume_keeps_stored_state() {
        let mut machine = Machine::resume(definition(), Some(1)).unwrap();

        machine.transition("done").unwrap();
        assert_eq!(machine.current_state_code(), Some(&2));
    }

    #[test]
    fn guard_veto_is_illegal() {
        let mut machine = Machine::new(definition())
            .unwrap()
            .with_guard(Guard::new(|ctx| !ctx.reaches_terminal()));

        machine.transition("go").unwrap();
        let err = machine.transition("done").unwrap_err();

        assert!(err.is_illegal());
        assert_eq!(machine.current_state_code(), Some(&1));
    }

    #[test]
    fn definition_guard_applies_to_instances() {
        let definition = Definition::<i32, &str>::builder("guarded")
            .transitions(transitions! { 0 => { "go" => 1, "skip" => 2 } })
            .guard(|ctx| ctx.symbol != Some(&"skip"))
            .build();
        let mut machine = Machine::new(definition).unwrap();

        assert!(machine.transition("skip").is_err());
        assert!(machine.transition("go").is_ok());
    }

    #[test]
    fn commit_runs_after_mutation() {
        let committed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&committed);
        let mut machine = Machine::new(definition()).unwrap().with_commit(move |code| {
            sink.lock().unwrap().push(*code);
            Ok(())
        });

        machine.transition("go").unwrap();
        machine.transition("done").unwrap();
        let _ = machine.transition("go");

        assert_eq!(*committed.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn commit_failure_keeps_in_memory_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let definition = definition();
        let counter = Arc::clone(&calls);
        definition
            .subscribe()
            .register("counter", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(json!(null))
            });
        let mut machine = Machine::new(definition)
            .unwrap()
            .with_commit(|_| Err("database unavailable".into()));

        let err = machine.transition("go").unwrap_err();

        assert!(matches!(err, TransitionError::Commit { .. }));
        assert_eq!(machine.current_state_code(), Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn next_state_and_available_symbols() {
        let machine = Machine::new(definition()).unwrap();

        assert_eq!(machine.next_state("skip"), Some(&State::new(2)));
        assert_eq!(machine.next_state("done"), None);
        assert_eq!(machine.available_symbols(), vec![Some(&"go"), Some(&"skip")]);
    }

    #[test]
    fn handlers_receive_the_moved_machine() {
        let definition = definition();
        definition
            .subscribe()
            .from(0)
            .register("observe", |machine, ctx| {
                Ok(json!({
                    "current": machine.current_state_code(),
                    "from": ctx.from.code,
                    "to": ctx.to.code,
                }))
            });
        let mut machine = Machine::new(definition).unwrap();

        let results = machine.transition("go").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].outcome,
            Ok(json!({"current": 1, "from": 0, "to": 1}))
        );
    }
}
