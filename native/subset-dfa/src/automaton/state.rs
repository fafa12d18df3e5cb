//! State types for automata.

use crate::automaton::error::{AutomatonError, Result};
use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use std::fmt;

/// A state identifier represented as a u32.
pub type StateId = u32;

/// A set of states implemented using a fixed-size bit set for efficiency.
#[derive(Clone)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all states in the set, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    /// Check if every state of this set is also in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.iter().all(|state| other.contains(state))
    }

    /// Sorted ids, used as the hashable key of a subset.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

// Capacity is not part of a set's identity.
impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let items: Vec<StateId> = iter.into_iter().collect();
        let capacity = items.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut set = Self::with_capacity(capacity);
        for state in items {
            set.insert(state);
        }
        set
    }
}

/// Interned NFA state names.
///
/// Ids are handed out in lexical order of the names, so iterating a
/// [`StateSet`] in id order visits the member names already sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTable {
    names: IndexSet<String>,
}

impl StateTable {
    /// Build a table from state names. Duplicates are merged.
    pub fn from_names<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut sorted: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(AutomatonError::EmptyStateName);
            }
            sorted.push(name.to_owned());
        }
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.len() > StateId::MAX as usize {
            return Err(AutomatonError::TooManyStates {
                max: StateId::MAX as usize,
            });
        }

        Ok(Self {
            names: sorted.into_iter().collect(),
        })
    }

    /// Look up the id of a state name.
    pub fn id(&self, name: &str) -> Option<StateId> {
        self.names.get_index_of(name).map(|i| i as StateId)
    }

    /// Look up the name of a state id.
    pub fn name(&self, id: StateId) -> Option<&str> {
        self.names.get_index(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names in id (lexical) order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

/// A DFA state: the set of NFA states it stands for.
///
/// Members are kept sorted and deduplicated, so two `DfaState`s are equal
/// exactly when their member sets are equal. The empty set is the dead
/// (sink) state; it is a structural value and never collides with a state
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DfaState {
    members: Box<[String]>,
}

impl DfaState {
    /// The dead (sink) state.
    pub fn dead() -> Self {
        Self::default()
    }

    /// Build a state from member names in any order.
    pub fn from_members<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut members: Vec<String> = members.into_iter().map(Into::into).collect();
        members.sort_unstable();
        members.dedup();
        Self {
            members: members.into_boxed_slice(),
        }
    }

    /// Build a state from the members of `set`, named through `table`.
    pub(crate) fn from_state_set(set: &StateSet, table: &StateTable) -> Self {
        // Table ids follow lexical order, so this is already sorted.
        let members: Vec<String> = set
            .iter()
            .filter_map(|id| table.name(id))
            .map(str::to_owned)
            .collect();
        Self {
            members: members.into_boxed_slice(),
        }
    }

    /// Member names, sorted lexically.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn is_dead(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members
            .binary_search_by(|member| member.as_str().cmp(name))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Formats the composition the way it is shown next to a label:
/// `{0, 1}`, or `∅` for the dead state.
impl fmt::Display for DfaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dead() {
            return f.write_str("∅");
        }
        write!(f, "{{{}}}", self.members.join(", "))
    }
}
