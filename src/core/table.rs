//! State table construction.
//!
//! Turns a [`TransitionSpec`] into the full set of states, merging every
//! declaration of a code and resolving which state is initial and which are
//! terminal. Building is pure; memoizing the result per machine definition
//! is the definition's job.

use super::context::Symbol;
use super::error::ConfigError;
use super::spec::TransitionSpec;
use super::state::{Code, State};
use std::collections::{HashMap, HashSet};

/// Every state of a machine definition plus its `(state, symbol) -> state`
/// lookup.
///
/// # Example
///
/// ```rust
/// use statekeeper::core::{StateTable, TransitionSpec};
///
/// let spec: TransitionSpec<i32, &str> = TransitionSpec::new()
///     .from(0, |t| t.on("go", 1).on("skip", 2))
///     .from(1, |t| t.on("done", 2));
///
/// let table = StateTable::build(&spec).unwrap();
///
/// assert_eq!(table.initial(), &0);
/// assert_eq!(table.terminals(), vec![&2]);
/// assert_eq!(table.next(&0, &Some("go")).map(|s| s.code), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct StateTable<C: Code, Y: Symbol> {
    order: Vec<C>,
    states: HashMap<C, State<C>>,
    edges: HashMap<C, Vec<(Option<Y>, C)>>,
    initial: C,
}

impl<C: Code, Y: Symbol> StateTable<C, Y> {
    /// Build the table from a transition spec.
    ///
    /// If no state is explicitly marked initial, the initial state is
    /// deduced as the one appearing only as a source. Likewise terminals
    /// default to the states appearing only as destinations.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ConflictingAttribute`] if one code is declared with two
    /// different labels or flags, [`ConfigError::InitialStateCount`] unless
    /// exactly one initial state results.
    pub fn build(spec: &TransitionSpec<C, Y>) -> Result<Self, ConfigError> {
        let mut order = Vec::new();
        let mut states: HashMap<C, State<C>> = HashMap::new();
        let mut edges: HashMap<C, Vec<(Option<Y>, C)>> = HashMap::new();
        let mut sources = HashSet::new();
        let mut destinations = HashSet::new();

        for entry in spec.entries() {
            collect(&mut states, &mut order, &entry.state)?;
            sources.insert(entry.state.code.clone());

            let outgoing = edges.entry(entry.state.code.clone()).or_default();
            for (symbol, destination) in &entry.transitions {
                collect(&mut states, &mut order, destination)?;
                destinations.insert(destination.code.clone());

                match outgoing.iter_mut().find(|(s, _)| s == symbol) {
                    Some(slot) => slot.1 = destination.code.clone(),
                    None => outgoing.push((symbol.clone(), destination.code.clone())),
                }
            }
        }

        let flagged = |pick: fn(&State<C>) -> Option<bool>| -> Vec<C> {
            order
                .iter()
                .filter(|code| states.get(*code).and_then(pick) == Some(true))
                .cloned()
                .collect()
        };
        let deduced = |pick: fn(&State<C>) -> Option<bool>,
                       only_in: &HashSet<C>,
                       never_in: &HashSet<C>|
         -> Vec<C> {
            order
                .iter()
                .filter(|code| only_in.contains(*code) && !never_in.contains(*code))
                .filter(|code| states.get(*code).and_then(pick) != Some(false))
                .cloned()
                .collect()
        };

        let mut initials = flagged(|s| s.is_initial);
        if initials.is_empty() {
            initials = deduced(|s| s.is_initial, &sources, &destinations);
        }
        let mut terminals = flagged(|s| s.is_terminal);
        if terminals.is_empty() {
            terminals = deduced(|s| s.is_terminal, &destinations, &sources);
        }

        let initial = match initials.as_slice() {
            [only] => only.clone(),
            _ => {
                return Err(ConfigError::InitialStateCount {
                    count: initials.len(),
                    candidates: initials.iter().map(|c| format!("{:?}", c)).collect(),
                })
            }
        };

        if let Some(state) = states.get_mut(&initial) {
            state.is_initial = Some(true);
        }
        for code in &terminals {
            if let Some(state) = states.get_mut(code) {
                state.is_terminal = Some(true);
            }
        }

        Ok(Self {
            order,
            states,
            edges,
            initial,
        })
    }

    pub fn get(&self, code: &C) -> Option<&State<C>> {
        self.states.get(code)
    }

    pub fn contains(&self, code: &C) -> bool {
        self.states.contains_key(code)
    }

    /// States in the order they were first mentioned in the spec.
    pub fn iter(&self) -> impl Iterator<Item = &State<C>> + '_ {
        self.order.iter().filter_map(|code| self.states.get(code))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The unique initial state.
    pub fn initial(&self) -> &State<C> {
        // `initial` is always one of the collected codes.
        &self.states[&self.initial]
    }

    pub fn terminals(&self) -> Vec<&State<C>> {
        self.iter().filter(|state| state.is_terminal()).collect()
    }

    /// The destination of `symbol` from `from`, if the spec defines one.
    pub fn next(&self, from: &C, symbol: &Option<Y>) -> Option<&State<C>> {
        self.edges
            .get(from)?
            .iter()
            .find(|(s, _)| s == symbol)
            .and_then(|(_, to)| self.states.get(to))
    }

    /// Symbols defined for `from`, in declaration order.
    pub fn symbols(&self, from: &C) -> Vec<Option<&Y>> {
        self.edges
            .get(from)
            .map(|outgoing| outgoing.iter().map(|(s, _)| s.as_ref()).collect())
            .unwrap_or_default()
    }
}

fn collect<C: Code>(
    states: &mut HashMap<C, State<C>>,
    order: &mut Vec<C>,
    declared: &State<C>,
) -> Result<(), ConfigError> {
    match states.get_mut(&declared.code) {
        Some(known) => known.absorb(declared),
        None => {
            order.push(declared.code.clone());
            states.insert(declared.code.clone(), declared.clone());
            Ok(())
        }
    }
}
