//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use crate::automaton::error::{AutomatonError, Result, StateRole};
use crate::automaton::options::ConversionOptions;
use crate::automaton::state::{StateId, StateSet, StateTable};
use crate::automaton::symbol::{EPSILON, SymbolId, SymbolTable, is_epsilon};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// An Epsilon Non-deterministic Finite Automaton over named states.
///
/// Built once through [`EpsilonNfaBuilder`], which validates the
/// description, and immutable afterwards apart from the closure cache.
#[derive(Debug, Clone)]
pub struct EpsilonNfa {
    /// State names; ids follow lexical order of the names
    states: StateTable,
    /// Effective alphabet (epsilon excluded)
    symbols: SymbolTable,
    /// Token that denoted epsilon in the description
    epsilon: String,
    initial_state: StateId,
    final_states: StateSet,
    /// Transitions: (source, symbol) -> set of destination states
    /// For epsilon transitions, symbol == EPSILON
    transitions: HashMap<(StateId, SymbolId), StateSet>,
    /// Cached epsilon closures for each state
    epsilon_closures: Option<Vec<StateSet>>,
}

impl EpsilonNfa {
    /// Start describing a new automaton.
    pub fn builder() -> EpsilonNfaBuilder {
        EpsilonNfaBuilder::default()
    }

    /// Get the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    /// The effective alphabet (epsilon excluded).
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn epsilon(&self) -> &str {
        &self.epsilon
    }

    pub fn initial_state(&self) -> StateId {
        self.initial_state
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// Empty state set sized for this automaton.
    pub fn empty_set(&self) -> StateSet {
        StateSet::with_capacity(self.num_states())
    }

    /// Set of states given by name. Unknown names are skipped.
    pub fn state_set<I>(&self, names: I) -> StateSet
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = self.empty_set();
        for name in names {
            if let Some(id) = self.states.id(name.as_ref()) {
                set.insert(id);
            }
        }
        set
    }

    /// Names of the members of `set`, sorted.
    pub fn state_names<'a>(&'a self, set: &'a StateSet) -> impl Iterator<Item = &'a str> + 'a {
        set.iter().filter_map(|id| self.states.name(id))
    }

    /// Compute the epsilon closure of a single state using DFS.
    fn epsilon_closure_single(&self, state: StateId) -> StateSet {
        self.epsilon_closure_uncached(&StateSet::singleton(state, self.num_states()))
    }

    /// Compute epsilon closures for all states (cached).
    pub fn compute_epsilon_closures(&mut self) {
        if self.epsilon_closures.is_some() {
            return;
        }

        let closures = (0..self.num_states() as StateId)
            .map(|state| self.epsilon_closure_single(state))
            .collect();
        self.epsilon_closures = Some(closures);
    }

    /// Get the epsilon closure of a set of states: the smallest superset of
    /// `states` closed under epsilon transitions.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let Some(cached) = &self.epsilon_closures else {
            return self.epsilon_closure_uncached(states);
        };

        let mut closure = self.empty_set();
        for state in states.iter() {
            if let Some(single) = cached.get(state as usize) {
                closure.union_with(single);
            }
        }
        closure
    }

    fn epsilon_closure_uncached(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(s) = stack.pop() {
            if let Some(destinations) = self.transitions.get(&(s, EPSILON)) {
                for dest in destinations.iter() {
                    // A state already in the closure is never pushed again,
                    // so epsilon cycles terminate.
                    if !closure.contains(dest) {
                        closure.insert(dest);
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// Get the states reachable from a set of states by one direct
    /// transition on `symbol`. No epsilon closure is applied.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        debug_assert!(!is_epsilon(symbol), "Use epsilon_closure for epsilon moves");

        let mut reached = self.empty_set();

        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }

        reached
    }

    /// The epsilon closure of the initial state.
    pub fn initial_closure(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.initial_state, self.num_states()))
    }

    /// Run a word through the automaton by simulating every branch at once.
    /// Symbols outside the alphabet reject.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut current = self.initial_closure();
        for symbol in word {
            let Some(symbol) = self.symbols.id(symbol.as_ref()) else {
                return false;
            };
            current = self.epsilon_closure(&self.move_on_symbol(&current, symbol));
            if current.is_empty() {
                return false;
            }
        }
        current.intersects(&self.final_states)
    }

    /// Check if the NFA accepts no string at all.
    /// Uses BFS from the initial state following all transitions.
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }

        let mut visited = self.empty_set();
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(self.initial_state);

        while let Some(state) = queue.pop_front() {
            if visited.contains(state) {
                continue;
            }
            visited.insert(state);

            if self.final_states.contains(state) {
                return false;
            }

            let successors = self
                .symbols
                .ids()
                .chain(std::iter::once(EPSILON))
                .filter_map(|symbol| self.transitions.get(&(state, symbol)));
            for destinations in successors {
                for dest in destinations.iter() {
                    if !visited.contains(dest) {
                        queue.push_back(dest);
                    }
                }
            }
        }

        true
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&(src, sym), dests)| dests.iter().map(move |dst| (src, sym, dst)))
    }

    /// Convert to a map representation for debugging:
    /// source name -> symbol token -> sorted target names.
    /// Epsilon moves are listed under the epsilon token.
    pub fn to_transition_map(&self) -> IndexMap<String, IndexMap<String, Vec<String>>> {
        let mut map: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();

        let symbols: Vec<(SymbolId, &str)> = self
            .symbols
            .iter()
            .chain(std::iter::once((EPSILON, self.epsilon.as_str())))
            .collect();
        for src in 0..self.num_states() as StateId {
            let Some(src_name) = self.states.name(src) else {
                continue;
            };
            for &(sym, token) in &symbols {
                if let Some(dests) = self.transitions.get(&(src, sym)) {
                    map.entry(src_name.to_owned())
                        .or_default()
                        .entry(token.to_owned())
                        .or_default()
                        .extend(self.state_names(dests).map(str::to_owned));
                }
            }
        }

        map
    }
}

/// Collects an automaton description and validates it into an
/// [`EpsilonNfa`].
///
/// An empty state list means the states are inferred from the initial
/// state, the final states and the transitions. The declared alphabet is
/// always the effective one: transitions on symbols outside it are never
/// followed, so an empty or epsilon-only alphabet gives a single-state DFA.
#[derive(Debug, Clone, Default)]
pub struct EpsilonNfaBuilder {
    states: Vec<String>,
    alphabet: Vec<String>,
    transitions: Vec<(String, String, Vec<String>)>,
    initial: Option<String>,
    finals: Vec<String>,
}

impl EpsilonNfaBuilder {
    /// Declare states.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.states
            .extend(states.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Declare alphabet symbols. The epsilon token may be included; it is
    /// never part of the effective alphabet.
    pub fn alphabet<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.alphabet
            .extend(symbols.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Add `(symbol, source) -> targets`. Repeated keys accumulate.
    pub fn transition<I>(mut self, symbol: &str, source: &str, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.transitions.push((
            symbol.to_owned(),
            source.to_owned(),
            targets.into_iter().map(|t| t.as_ref().to_owned()).collect(),
        ));
        self
    }

    pub fn initial(mut self, state: &str) -> Self {
        self.initial = Some(state.to_owned());
        self
    }

    pub fn finals<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.finals
            .extend(states.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    /// Validate the description and build the automaton.
    pub fn build(self, options: &ConversionOptions) -> Result<EpsilonNfa> {
        let epsilon = options.epsilon.as_str();
        let initial = self.initial.ok_or(AutomatonError::MissingInitialState)?;

        let inferred_states = self.states.is_empty();
        let states = if inferred_states {
            let mut names: IndexSet<&str> = IndexSet::new();
            names.insert(&initial);
            names.extend(self.finals.iter().map(String::as_str));
            for (_, source, targets) in &self.transitions {
                names.insert(source);
                names.extend(targets.iter().map(String::as_str));
            }
            StateTable::from_names(names)?
        } else {
            StateTable::from_names(&self.states)?
        };

        let mut symbols = SymbolTable::new();
        for symbol in &self.alphabet {
            if symbol != epsilon {
                symbols.intern(symbol)?;
            }
        }

        let lookup = |name: &str, role: StateRole| {
            states.id(name).ok_or_else(|| AutomatonError::UnknownState {
                name: name.to_owned(),
                role,
            })
        };

        let num_states = states.len();
        let mut transitions: HashMap<(StateId, SymbolId), StateSet> = HashMap::new();
        let mut ignored = 0usize;
        for (symbol, source, targets) in &self.transitions {
            // States are checked even when the symbol is outside the alphabet.
            let source_id = lookup(source.as_str(), StateRole::TransitionSource)?;
            let mut destinations = StateSet::with_capacity(num_states);
            for target in targets {
                destinations.insert(lookup(target.as_str(), StateRole::TransitionTarget)?);
            }

            let symbol_id = if symbol == epsilon {
                EPSILON
            } else if let Some(id) = symbols.id(symbol) {
                id
            } else {
                debug!(
                    symbol = %symbol,
                    source = %source,
                    "ignoring transition outside the alphabet"
                );
                ignored += 1;
                continue;
            };
            transitions
                .entry((source_id, symbol_id))
                .or_insert_with(|| StateSet::with_capacity(num_states))
                .union_with(&destinations);
        }

        let initial_state = states
            .id(&initial)
            .ok_or_else(|| AutomatonError::UnknownInitialState(initial.clone()))?;

        let mut final_states = StateSet::with_capacity(num_states);
        for name in &self.finals {
            final_states.insert(lookup(name.as_str(), StateRole::Final)?);
        }

        debug!(
            states = num_states,
            symbols = symbols.len(),
            transitions = transitions.len(),
            ignored_transitions = ignored,
            inferred_states,
            "built epsilon-NFA"
        );

        let mut nfa = EpsilonNfa {
            states,
            symbols,
            epsilon: epsilon.to_owned(),
            initial_state,
            final_states,
            transitions,
            epsilon_closures: None,
        };
        if options.precompute_closures {
            nfa.compute_epsilon_closures();
        }
        Ok(nfa)
    }
}
