//! Property-based tests for state tables and machines.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use statekeeper::builder::{Definition, SpecDocument};
use statekeeper::core::{Guard, State, StateTable, TransitionContext, TransitionSpec};
use statekeeper::engine::Machine;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// A straight chain `0 -> 1 -> ... -> len` driven by the symbol `"next"`.
fn chain(len: u32) -> TransitionSpec<u32, &'static str> {
    (0..len).fold(TransitionSpec::new(), |spec, code| {
        spec.edge(code, "next", code + 1)
    })
}

prop_compose! {
    fn arbitrary_state()(
        code in 0..16i64,
        label in proptest::option::of("[a-z]{1,8}"),
        initial in proptest::option::of(any::<bool>()),
        terminal in proptest::option::of(any::<bool>()),
    ) -> State<i64> {
        State {
            code,
            label,
            is_initial: initial,
            is_terminal: terminal,
        }
    }
}

proptest! {
    #[test]
    fn state_equals_its_code(state in arbitrary_state()) {
        let code = state.code;
        prop_assert!(state == code);
        prop_assert!(code == state);
        prop_assert_eq!(state, State::new(code));
    }

    #[test]
    fn state_hashes_like_its_code(state in arbitrary_state()) {
        prop_assert_eq!(hash_of(&state), hash_of(&state.code));
        prop_assert_eq!(hash_of(&state), hash_of(&State::<i64>::new(state.code)));
    }

    #[test]
    fn states_with_equal_codes_collapse_in_sets(a in arbitrary_state(), b in arbitrary_state()) {
        let set: HashSet<State<i64>> = [a.clone(), b.clone()].into_iter().collect();
        let expected = if a.code == b.code { 1 } else { 2 };
        prop_assert_eq!(set.len(), expected);
        prop_assert!(set.contains(&a.code));
    }

    #[test]
    fn merge_with_bare_code_is_identity(state in arbitrary_state()) {
        let mut merged = state.clone();
        merged.merge_data(&State::new(state.code)).unwrap();
        prop_assert_eq!(merged.label, state.label);
        prop_assert_eq!(merged.is_initial, state.is_initial);
        prop_assert_eq!(merged.is_terminal, state.is_terminal);
    }

    #[test]
    fn chain_deduces_first_and_last(len in 1..32u32) {
        let table = StateTable::build(&chain(len)).unwrap();

        prop_assert_eq!(table.len(), len as usize + 1);
        prop_assert_eq!(table.initial(), &0);
        prop_assert_eq!(table.terminals(), vec![&len]);
        prop_assert_eq!(table.iter().filter(|s| s.is_initial()).count(), 1);
    }

    #[test]
    fn chain_walk_reaches_terminal(len in 1..32u32) {
        let definition = Definition::builder("chain").transitions(chain(len)).build();
        let mut machine = Machine::new(definition).unwrap();

        for step in 1..=len {
            prop_assert!(!machine.is_terminal());
            machine.transition("next").unwrap();
            prop_assert_eq!(machine.current_state_code(), Some(&step));
        }
        prop_assert!(machine.is_terminal());
        prop_assert!(machine.transition("next").unwrap_err().is_illegal());
    }

    #[test]
    fn undefined_symbols_never_move_the_machine(
        len in 1..16u32,
        start in 0..16u32,
        symbol in "[a-z]{1,6}",
    ) {
        prop_assume!(symbol != "next");
        let start = start % (len + 1);
        let spec = (0..len).fold(TransitionSpec::new(), |spec, code| {
            spec.edge(code, "next".to_string(), code + 1)
        });
        let definition = Definition::builder("chain").transitions(spec).build();
        let mut machine = Machine::<u32, String>::resume(definition, Some(start)).unwrap();

        prop_assert!(machine.transition(symbol).unwrap_err().is_illegal());
        prop_assert!(machine.transition(None).unwrap_err().is_illegal());
        prop_assert_eq!(machine.current_state_code(), Some(&start));
    }

    #[test]
    fn guard_is_deterministic(from in 0..8u32, to in 0..8u32) {
        let guard = Guard::<u32, &str>::new(|ctx| ctx.from.code < ctx.to.code);
        let (from, to) = (State::new(from), State::new(to));
        let ctx = TransitionContext::new(&from, Some(&"next"), &to);

        prop_assert_eq!(guard.check(&ctx), guard.check(&ctx));
        prop_assert_eq!(guard.check(&ctx), from.code < to.code);
    }

    #[test]
    fn spec_document_preserves_the_table(len in 1..16u32) {
        let spec = chain(len);
        let json = serde_json::to_string(&SpecDocument::from(&spec)).unwrap();
        let document: SpecDocument<u32, String> = serde_json::from_str(&json).unwrap();
        let reloaded = StateTable::build(&document.into_spec().unwrap()).unwrap();
        let original = StateTable::build(&spec).unwrap();

        prop_assert_eq!(reloaded.initial(), original.initial());
        prop_assert_eq!(reloaded.len(), original.len());
        for code in 0..len {
            prop_assert_eq!(
                reloaded.next(&code, &Some("next".to_string())),
                original.next(&code, &Some("next"))
            );
        }
    }
}
