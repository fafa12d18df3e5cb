//! Deterministic Finite Automaton (DFA) produced by subset construction.

use crate::automaton::state::{DfaState, StateId, StateSet};
use crate::automaton::symbol::{SymbolId, SymbolTable};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};

/// A Deterministic Finite Automaton whose states are sets of NFA states.
///
/// States are numbered in discovery order and the start state is always
/// state 0. Once built by subset construction the transition function is
/// total over the effective alphabet.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Composition of each state, indexed by state id
    states: Vec<DfaState>,
    /// Reverse of `states`
    index: HashMap<DfaState, StateId>,
    /// Final (accepting) states
    final_states: StateSet,
    /// The synthesized sink state, if it was ever reached
    dead_state: Option<StateId>,
    /// Transitions: (source, symbol) -> destination
    transitions: HashMap<(StateId, SymbolId), StateId>,
    /// Effective alphabet shared with the source NFA
    symbols: SymbolTable,
}

impl Dfa {
    pub(crate) fn new(symbols: SymbolTable) -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
            final_states: StateSet::with_capacity(16),
            dead_state: None,
            transitions: HashMap::new(),
            symbols,
        }
    }

    /// Add a new state and return its ID.
    pub(crate) fn add_state(&mut self, composition: DfaState) -> StateId {
        let id = self.states.len() as StateId;
        if composition.is_dead() {
            self.dead_state = Some(id);
        }
        self.index.insert(composition.clone(), id);
        self.states.push(composition);
        id
    }

    /// Add a final (accepting) state.
    pub(crate) fn add_final_state(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    /// Add a transition.
    pub(crate) fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        self.transitions.insert((source, symbol), destination);
    }

    /// Get the transition from a state on a symbol.
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    /// Get the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get the start state.
    pub fn start_state(&self) -> StateId {
        0
    }

    /// The initial DFA state: the epsilon closure of the NFA initial state.
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.start_state() as usize]
    }

    pub fn dead_state(&self) -> Option<StateId> {
        self.dead_state
    }

    /// All states in discovery order.
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&DfaState> {
        self.states.get(id as usize)
    }

    pub fn state_id(&self, state: &DfaState) -> Option<StateId> {
        self.index.get(state).copied()
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    /// Get the final states as ids.
    pub fn final_state_ids(&self) -> &StateSet {
        &self.final_states
    }

    /// Final states in discovery order.
    pub fn final_states(&self) -> impl Iterator<Item = &DfaState> + '_ {
        self.final_states
            .iter()
            .filter_map(|id| self.states.get(id as usize))
    }

    /// The effective alphabet (epsilon excluded).
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions
            .iter()
            .map(|(&(src, sym), &dst)| (src, sym, dst))
    }

    /// Follow `symbol` out of `state`, by value.
    pub fn next_state(&self, state: &DfaState, symbol: &str) -> Option<&DfaState> {
        let source = self.state_id(state)?;
        let symbol = self.symbols.id(symbol)?;
        self.transition(source, symbol)
            .and_then(|dst| self.state(dst))
    }

    /// The transition function keyed by value:
    /// `(state, symbol) -> state`, ordered by discovery then symbol.
    pub fn transition_map(&self) -> IndexMap<(DfaState, String), DfaState> {
        let mut map = IndexMap::with_capacity(self.transitions.len());
        for (src, composition) in self.states.iter().enumerate() {
            for (symbol, token) in self.symbols.iter() {
                if let Some(dst) = self.transition(src as StateId, symbol) {
                    map.insert(
                        (composition.clone(), token.to_owned()),
                        self.states[dst as usize].clone(),
                    );
                }
            }
        }
        map
    }

    /// Check that every state has exactly one transition on every symbol.
    pub fn is_complete(&self) -> bool {
        (0..self.num_states() as StateId)
            .all(|state| self.symbols.ids().all(|symbol| self.transition(state, symbol).is_some()))
    }

    /// Run a word through the DFA. Symbols outside the alphabet reject.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut state = self.start_state();
        for symbol in word {
            let Some(symbol) = self.symbols.id(symbol.as_ref()) else {
                return false;
            };
            let Some(next) = self.transition(state, symbol) else {
                return false;
            };
            state = next;
        }
        self.is_final(state)
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }
        !self.reachable_states().intersects(&self.final_states)
    }

    /// Find all states reachable from the start state.
    pub fn reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.num_states());
        if self.states.is_empty() {
            return reachable;
        }

        let mut queue = VecDeque::new();
        queue.push_back(self.start_state());

        while let Some(state) = queue.pop_front() {
            if reachable.contains(state) {
                continue;
            }
            reachable.insert(state);

            for symbol in self.symbols.ids() {
                if let Some(next) = self.transition(state, symbol) {
                    if !reachable.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        reachable
    }
}
