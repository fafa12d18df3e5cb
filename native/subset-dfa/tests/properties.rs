//! Property-based tests for subset construction and labeling
//!
//! Tests:
//! - Epsilon closure and symbol moves
//! - Totality, final states and reachability of the DFA
//! - Language equivalence between the NFA and the DFA
//! - Label bijectivity and order independence

use proptest::prelude::*;
use subset_dfa::automaton::{EpsilonNfa, StateSet};
use subset_dfa::{ConversionOptions, Dfa, label, subset_construction};

const SYMBOLS: [&str; 4] = ["a", "b", "c", "e"];

#[derive(Debug, Clone)]
struct RandomNfa {
    states: Vec<String>,
    transitions: Vec<(&'static str, String, Vec<String>)>,
    initial: String,
    finals: Vec<String>,
}

impl RandomNfa {
    fn build(&self, alphabet: &[&str]) -> EpsilonNfa {
        self.transitions
            .iter()
            .fold(
                EpsilonNfa::builder()
                    .states(&self.states)
                    .alphabet(alphabet)
                    .initial(&self.initial)
                    .finals(&self.finals),
                |builder, (symbol, source, targets)| builder.transition(symbol, source, targets),
            )
            .build(&ConversionOptions::default())
            .unwrap()
    }
}

fn name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

fn random_nfa() -> impl Strategy<Value = RandomNfa> {
    (1usize..7, prop_oneof![Just("q"), Just("")]).prop_flat_map(|(n, prefix)| {
        let transition = (
            0..SYMBOLS.len(),
            0..n,
            proptest::collection::vec(0..n, 0..3),
        );
        (
            proptest::collection::vec(transition, 0..14),
            0..n,
            proptest::collection::vec(0..n, 0..3),
        )
            .prop_map(move |(transitions, initial, finals)| RandomNfa {
                states: (0..n).map(|i| name(prefix, i)).collect(),
                transitions: transitions
                    .into_iter()
                    .map(|(symbol, source, targets)| {
                        (
                            SYMBOLS[symbol],
                            name(prefix, source),
                            targets.into_iter().map(|t| name(prefix, t)).collect(),
                        )
                    })
                    .collect(),
                initial: name(prefix, initial),
                finals: finals.into_iter().map(|f| name(prefix, f)).collect(),
            })
    })
}

fn random_word() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c")], 0..8)
}

fn subset(nfa: &EpsilonNfa, mask: u8) -> StateSet {
    let mut set = nfa.empty_set();
    for state in 0..nfa.num_states() as u32 {
        if mask & (1 << state) != 0 {
            set.insert(state);
        }
    }
    set
}

fn convert(nfa: &RandomNfa) -> (EpsilonNfa, Dfa) {
    let nfa = nfa.build(&SYMBOLS);
    let dfa = subset_construction(&nfa);
    (nfa, dfa)
}

proptest! {
    /// Closing twice adds nothing
    #[test]
    fn closure_is_idempotent(nfa in random_nfa(), mask in any::<u8>()) {
        let nfa = nfa.build(&SYMBOLS);
        let set = subset(&nfa, mask);
        let once = nfa.epsilon_closure(&set);
        prop_assert!(set.is_subset(&once));
        prop_assert_eq!(nfa.epsilon_closure(&once), once);
    }

    /// A move is empty iff no member has a transition on the symbol
    #[test]
    fn move_is_empty_without_transitions(nfa in random_nfa(), mask in any::<u8>()) {
        let nfa = nfa.build(&SYMBOLS);
        let set = subset(&nfa, mask);
        for (symbol, _) in nfa.symbols().iter() {
            let has_edge = nfa
                .transitions()
                .any(|(src, sym, _)| sym == symbol && set.contains(src));
            prop_assert_eq!(nfa.move_on_symbol(&set, symbol).is_empty(), !has_edge);
        }
    }

    /// Every state has exactly one successor per symbol
    #[test]
    fn dfa_is_total(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        prop_assert!(dfa.is_complete());
        prop_assert_eq!(
            dfa.transitions().count(),
            dfa.num_states() * dfa.symbols().len()
        );
    }

    /// A DFA state is final iff it contains an NFA final state
    #[test]
    fn final_states_intersect_nfa_finals(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        for (id, state) in dfa.states().iter().enumerate() {
            let expected = state.members().iter().any(|m| nfa.finals.contains(m));
            prop_assert_eq!(dfa.is_final(id as u32), expected);
        }
    }

    /// Every discovered state is reachable from the initial state
    #[test]
    fn every_state_is_reachable(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        prop_assert_eq!(dfa.reachable_states().len(), dfa.num_states());
    }

    /// Discovered states are pairwise distinct sets
    #[test]
    fn states_are_distinct(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        for (id, state) in dfa.states().iter().enumerate() {
            prop_assert_eq!(dfa.state_id(state), Some(id as u32));
        }
    }

    /// The DFA accepts exactly the words the NFA accepts
    #[test]
    fn languages_agree(nfa in random_nfa(), words in proptest::collection::vec(random_word(), 1..10)) {
        let (nfa, dfa) = convert(&nfa);
        for word in words {
            prop_assert_eq!(dfa.accepts(&word), nfa.accepts(&word), "word {:?}", word);
        }
    }

    /// Alphabet order changes discovery order, never the result
    #[test]
    fn symbol_order_does_not_matter(nfa in random_nfa()) {
        let forward = subset_construction(&nfa.build(&SYMBOLS));
        let mut reversed_symbols = SYMBOLS;
        reversed_symbols.reverse();
        let backward = subset_construction(&nfa.build(&reversed_symbols));

        prop_assert_eq!(forward.transition_map(), backward.transition_map());
        prop_assert_eq!(label(forward.states()), label(backward.states()));
    }

    /// Labels form a bijection with the states
    #[test]
    fn labels_are_bijective(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        let labels = label(dfa.states());
        prop_assert_eq!(labels.len(), dfa.num_states());
        prop_assert_eq!(labels.by_label().len(), dfa.num_states());
        for state in dfa.states() {
            let name = labels.get(state).unwrap();
            prop_assert_eq!(labels.state(name.as_str()), Some(state));
        }
    }

    /// Labeling a shuffled state list gives the same labels
    #[test]
    fn labels_ignore_input_order(nfa in random_nfa(), seed in any::<u64>()) {
        let (_, dfa) = convert(&nfa);
        let mut shuffled: Vec<_> = dfa.states().iter().collect();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
        }
        prop_assert_eq!(label(shuffled), label(dfa.states()));
    }

    /// The relabeled table covers every state and agrees with the DFA
    #[test]
    fn relabeled_table_matches_dfa(nfa in random_nfa()) {
        let (_, dfa) = convert(&nfa);
        let labels = label(dfa.states());
        let table = labels.relabel(&dfa).unwrap();

        prop_assert_eq!(table.rows.len(), dfa.num_states());
        prop_assert_eq!(Some(&table.initial), labels.get(dfa.initial_state()));
        for (state, label) in labels.iter() {
            for symbol in &table.symbols {
                let expected = dfa.next_state(state, symbol).and_then(|s| labels.get(s));
                prop_assert_eq!(table.target(label.as_str(), symbol), expected);
            }
        }
    }
}
