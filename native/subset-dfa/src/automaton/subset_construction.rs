//! Subset construction algorithm for converting ε-NFA to DFA.

use crate::automaton::dfa::Dfa;
use crate::automaton::epsilon_nfa::EpsilonNfa;
use crate::automaton::error::Result;
use crate::automaton::options::ConversionOptions;
use crate::automaton::state::{DfaState, StateId, StateSet};
use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm.
///
/// Only configurations reachable from the initial closure are explored.
/// Whenever some configuration has no move on a symbol, the empty
/// configuration (the dead state) is added with a self-loop on every
/// symbol, so the result is always total.
pub fn subset_construction(nfa: &EpsilonNfa) -> Dfa {
    // Each DFA state corresponds to a set of NFA states; the sorted ids are
    // the deduplication key.
    let mut discovered: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut dfa = Dfa::new(nfa.symbols().clone());

    // FIFO queue of unmarked DFA states
    let mut worklist: VecDeque<(StateSet, StateId)> = VecDeque::new();

    let initial_set = nfa.initial_closure();
    let initial_dfa_state = add_state(&mut dfa, nfa, &initial_set);
    discovered.insert(initial_set.to_vec(), initial_dfa_state);
    worklist.push_back((initial_set, initial_dfa_state));

    while let Some((current_nfa_set, current_dfa_state)) = worklist.pop_front() {
        for symbol in nfa.symbols().ids() {
            let next_nfa_set = nfa.epsilon_closure(&nfa.move_on_symbol(&current_nfa_set, symbol));
            let next_vec = next_nfa_set.to_vec();

            let next_dfa_state = match discovered.get(&next_vec) {
                Some(&existing) => existing,
                None => {
                    let new_state = add_state(&mut dfa, nfa, &next_nfa_set);
                    discovered.insert(next_vec, new_state);
                    // The dead state gets its self-loops once, below.
                    if !next_nfa_set.is_empty() {
                        worklist.push_back((next_nfa_set, new_state));
                    }
                    new_state
                }
            };

            dfa.add_transition(current_dfa_state, symbol, next_dfa_state);
        }
    }

    if let Some(dead) = dfa.dead_state() {
        for symbol in nfa.symbols().ids() {
            dfa.add_transition(dead, symbol, dead);
        }
    }

    debug!(
        nfa_states = nfa.num_states(),
        dfa_states = dfa.num_states(),
        final_states = dfa.final_state_ids().len(),
        dead_state = dfa.dead_state().is_some(),
        "subset construction finished"
    );

    dfa
}

fn add_state(dfa: &mut Dfa, nfa: &EpsilonNfa, set: &StateSet) -> StateId {
    let composition = DfaState::from_state_set(set, nfa.states());
    trace!(state = %composition, "discovered DFA state");

    let id = dfa.add_state(composition);
    if set.intersects(nfa.final_states()) {
        dfa.add_final_state(id);
    }
    id
}

/// Convert an automaton description to a DFA with default options.
///
/// `transitions` yields `(symbol, source, targets)`, i.e. the relation
/// `(symbol, state) -> set of states`. See [`convert_with_options`].
pub fn convert<S, A, T, Sym, Src, Tgt, F>(
    states: S,
    alphabet: A,
    transitions: T,
    initial: &str,
    finals: F,
) -> Result<Dfa>
where
    S: IntoIterator,
    S::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
    T: IntoIterator<Item = (Sym, Src, Tgt)>,
    Sym: AsRef<str>,
    Src: AsRef<str>,
    Tgt: IntoIterator,
    Tgt::Item: AsRef<str>,
    F: IntoIterator,
    F::Item: AsRef<str>,
{
    convert_with_options(
        states,
        alphabet,
        transitions,
        initial,
        finals,
        &ConversionOptions::default(),
    )
}

/// Validate an automaton description and run subset construction on it.
///
/// Fails without producing anything if the description references an
/// undeclared state. An empty `states` is inferred from the rest of the
/// description. `alphabet` is taken as given: transitions on other symbols
/// are ignored.
pub fn convert_with_options<S, A, T, Sym, Src, Tgt, F>(
    states: S,
    alphabet: A,
    transitions: T,
    initial: &str,
    finals: F,
    options: &ConversionOptions,
) -> Result<Dfa>
where
    S: IntoIterator,
    S::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
    T: IntoIterator<Item = (Sym, Src, Tgt)>,
    Sym: AsRef<str>,
    Src: AsRef<str>,
    Tgt: IntoIterator,
    Tgt::Item: AsRef<str>,
    F: IntoIterator,
    F::Item: AsRef<str>,
{
    let builder = transitions.into_iter().fold(
        EpsilonNfa::builder()
            .states(states)
            .alphabet(alphabet)
            .initial(initial)
            .finals(finals),
        |builder, (symbol, source, targets)| {
            builder.transition(symbol.as_ref(), source.as_ref(), targets)
        },
    );
    let nfa = builder.build(options)?;
    Ok(subset_construction(&nfa))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::error::AutomatonError;

    fn state(members: &[&str]) -> DfaState {
        DfaState::from_members(members.iter().copied())
    }

    #[test]
    fn test_subset_construction_basic() {
        // NFA: 0 -a-> 1, 0 -a-> 2, 1 -b-> 3(final), 2 -b-> 3(final)
        let nfa = EpsilonNfa::builder()
            .alphabet(["a", "b"])
            .transition("a", "0", ["1", "2"])
            .transition("b", "1", ["3"])
            .transition("b", "2", ["3"])
            .initial("0")
            .finals(["3"])
            .build(&ConversionOptions::default())
            .unwrap();

        let dfa = subset_construction(&nfa);

        assert_eq!(dfa.initial_state(), &state(&["0"]));
        assert_eq!(dfa.next_state(&state(&["0"]), "a"), Some(&state(&["1", "2"])));
        assert_eq!(dfa.next_state(&state(&["1", "2"]), "b"), Some(&state(&["3"])));
        assert_eq!(dfa.final_states().collect::<Vec<_>>(), [&state(&["3"])]);
        // {0}, {1,2}, dead, {3}
        assert_eq!(dfa.num_states(), 4);
        assert!(dfa.is_complete());
    }

    #[test]
    fn test_subset_construction_with_epsilon() {
        // NFA: 0 -ε-> 1 -a-> 2(final)
        let dfa = convert(
            ["0", "1", "2"],
            ["a", "e"],
            [("e", "0", vec!["1"]), ("a", "1", vec!["2"])],
            "0",
            ["2"],
        )
        .unwrap();

        assert_eq!(dfa.initial_state(), &state(&["0", "1"]));
        assert!(dfa.accepts(["a"]));
        assert!(!dfa.accepts(["a", "a"]));
    }

    #[test]
    fn test_discovery_is_breadth_first() {
        // 0 -a-> 1 -a-> 2, 0 -b-> 3
        let dfa = convert(
            ["0", "1", "2", "3"],
            ["a", "b"],
            [
                ("a", "0", vec!["1"]),
                ("a", "1", vec!["2"]),
                ("b", "0", vec!["3"]),
            ],
            "0",
            Vec::<&str>::new(),
        )
        .unwrap();

        let order: Vec<String> = dfa.states().iter().map(ToString::to_string).collect();
        assert_eq!(order, ["{0}", "{1}", "{3}", "{2}", "∅"]);
    }

    #[test]
    fn test_dead_state_is_completed_once() {
        let dfa = convert(["0"], ["a", "b"], [("a", "0", vec!["0"])], "0", ["0"]).unwrap();

        let dead = dfa.dead_state().unwrap();
        assert_eq!(dfa.num_states(), 2);
        assert!(!dfa.is_final(dead));
        for symbol in dfa.symbols().ids() {
            assert_eq!(dfa.transition(dead, symbol), Some(dead));
        }
        assert!(dfa.accepts(["a", "a"]));
        assert!(!dfa.accepts(["a", "b", "a"]));
    }

    #[test]
    fn test_only_epsilon_alphabet() {
        let dfa = convert(["0", "1"], ["e"], [("e", "0", vec!["1"])], "0", ["1"]).unwrap();

        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.transitions().count(), 0);
        assert_eq!(dfa.dead_state(), None);
        assert!(dfa.is_final(dfa.start_state()));
        assert!(dfa.accepts(Vec::<&str>::new()));
    }

    #[test]
    fn test_only_epsilon_alphabet_ignores_other_symbols() {
        let dfa = convert(
            ["0", "1"],
            ["e"],
            [("e", "0", vec!["1"]), ("a", "1", vec!["0"])],
            "0",
            ["1"],
        )
        .unwrap();

        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.initial_state(), &state(&["0", "1"]));
        assert_eq!(dfa.transitions().count(), 0);
        assert!(dfa.symbols().is_empty());
        assert!(!dfa.accepts(["a"]));
    }

    #[test]
    fn test_empty_alphabet_is_trivial() {
        let dfa = convert(
            ["0", "1"],
            Vec::<&str>::new(),
            [("a", "0", vec!["1"])],
            "0",
            ["1"],
        )
        .unwrap();

        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.initial_state(), &state(&["0"]));
        assert_eq!(dfa.dead_state(), None);
        assert!(dfa.is_empty());
    }

    #[test]
    fn test_empty_description_is_trivial() {
        let dfa = convert(
            Vec::<&str>::new(),
            Vec::<&str>::new(),
            Vec::<(&str, &str, Vec<&str>)>::new(),
            "s",
            Vec::<&str>::new(),
        )
        .unwrap();

        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.initial_state(), &state(&["s"]));
        assert!(dfa.is_empty());
    }

    #[test]
    fn test_unreachable_nfa_states_never_appear() {
        let dfa = convert(
            ["0", "1", "x"],
            ["a"],
            [("a", "0", vec!["1"]), ("a", "x", vec!["0"])],
            "0",
            ["1"],
        )
        .unwrap();

        assert!(dfa.states().iter().all(|s| !s.contains("x")));
    }

    #[test]
    fn test_closure_cache_does_not_change_result() {
        let transitions = [
            ("e", "0", vec!["1", "3"]),
            ("a", "1", vec!["2"]),
            ("e", "2", vec!["0"]),
            ("b", "3", vec!["3", "4"]),
        ];
        let cached = convert(
            Vec::<&str>::new(),
            ["a", "b"],
            transitions.clone(),
            "0",
            ["4"],
        )
        .unwrap();
        let uncached = convert_with_options(
            Vec::<&str>::new(),
            ["a", "b"],
            transitions,
            "0",
            ["4"],
            &ConversionOptions {
                precompute_closures: false,
                ..ConversionOptions::default()
            },
        )
        .unwrap();

        assert_eq!(cached.transition_map(), uncached.transition_map());
    }

    #[test]
    fn test_malformed_input_fails() {
        let err = convert(["0"], ["a"], [("a", "0", vec!["1"])], "0", ["0"]).unwrap_err();
        assert!(matches!(err, AutomatonError::UnknownState { .. }));

        let err = convert(["0"], ["a"], Vec::<(&str, &str, Vec<&str>)>::new(), "1", ["0"])
            .unwrap_err();
        assert_eq!(err, AutomatonError::UnknownInitialState("1".to_string()));
    }
}
