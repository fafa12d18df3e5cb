//! Canonical, human-readable labels for DFA states.
//!
//! Labels depend only on the contents of the states, never on the order in
//! which subset construction discovered them:
//! - every state gets a canonical key (its member names, sorted and joined
//!   with `,`; the dead state has its own key that sorts first);
//! - states are labeled in key order;
//! - labels are numbers (`1`, `2`, ...) when every NFA state name is purely
//!   alphabetic and there is no dead state, and letters (`A`..`Z`, then
//!   `Z1`, `Z2`, ...) otherwise, so labels never look like the NFA's own
//!   state names.

use crate::automaton::dfa::Dfa;
use crate::automaton::error::{AutomatonError, Result};
use crate::automaton::options::{ConversionOptions, DEFAULT_OVERFLOW_PREFIX};
use crate::automaton::state::{DfaState, StateId};
use indexmap::{IndexMap, IndexSet};
use std::borrow::Borrow;
use std::fmt;
use tracing::debug;

const LETTERS: usize = 26;

/// Sort key of a DFA state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalKey {
    /// The dead state. Declared first so it sorts before every member key.
    Dead,
    /// Sorted member names joined with `,`.
    Members(String),
}

impl CanonicalKey {
    pub fn of(state: &DfaState) -> Self {
        if state.is_dead() {
            CanonicalKey::Dead
        } else {
            CanonicalKey::Members(state.members().join(","))
        }
    }
}

/// Which label sequence a [`StateLabels`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingMode {
    /// `1`, `2`, `3`, ...
    Numeric,
    /// `A`..`Z`, then the overflow prefix followed by `1`, `2`, ...
    Alphabetic,
}

impl NamingMode {
    /// Numeric when every member name is purely alphabetic and no state is
    /// the dead state; alphabetic otherwise.
    pub fn detect<'a, I>(states: I) -> Self
    where
        I: IntoIterator<Item = &'a DfaState>,
    {
        let letters_only = |name: &String| name.chars().all(char::is_alphabetic);
        for state in states {
            if state.is_dead() || !state.members().iter().all(letters_only) {
                return NamingMode::Alphabetic;
            }
        }
        NamingMode::Numeric
    }

    /// The label at position `index` (0-based) of this mode's sequence.
    pub fn label(self, index: usize, overflow_prefix: char) -> Label {
        match self {
            NamingMode::Numeric => Label(format!("{}", index + 1)),
            NamingMode::Alphabetic if index < LETTERS => {
                Label(char::from(b'A' + index as u8).to_string())
            }
            NamingMode::Alphabetic => Label(format!("{overflow_prefix}{}", index - LETTERS + 1)),
        }
    }
}

impl fmt::Display for NamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingMode::Numeric => "numeric",
            NamingMode::Alphabetic => "alphabetic",
        })
    }
}

/// Display name of a DFA state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// A bijection between DFA states and their labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLabels {
    mode: NamingMode,
    /// In canonical order
    to_label: IndexMap<DfaState, Label>,
    /// In canonical order
    from_label: IndexMap<Label, DfaState>,
}

/// Label DFA states with the default overflow prefix.
pub fn label<'a, I>(states: I) -> StateLabels
where
    I: IntoIterator<Item = &'a DfaState>,
{
    label_with_prefix(states, DEFAULT_OVERFLOW_PREFIX)
}

/// Label DFA states using the overflow prefix from `options`.
pub fn label_with_options<'a, I>(states: I, options: &ConversionOptions) -> StateLabels
where
    I: IntoIterator<Item = &'a DfaState>,
{
    label_with_prefix(states, options.overflow_prefix)
}

fn label_with_prefix<'a, I>(states: I, overflow_prefix: char) -> StateLabels
where
    I: IntoIterator<Item = &'a DfaState>,
{
    let unique: IndexSet<&DfaState> = states.into_iter().collect();
    let mode = NamingMode::detect(unique.iter().copied());

    let mut ordered: Vec<(CanonicalKey, &DfaState)> = unique
        .into_iter()
        .map(|state| (CanonicalKey::of(state), state))
        .collect();
    // Names containing the separator can share a key; members break the tie.
    ordered.sort_by(|(a_key, a), (b_key, b)| {
        a_key.cmp(b_key).then_with(|| a.members().cmp(b.members()))
    });

    let mut to_label = IndexMap::with_capacity(ordered.len());
    let mut from_label = IndexMap::with_capacity(ordered.len());
    for (index, (_, state)) in ordered.into_iter().enumerate() {
        let label = mode.label(index, overflow_prefix);
        to_label.insert(state.clone(), label.clone());
        from_label.insert(label, state.clone());
    }

    debug!(states = to_label.len(), %mode, "labeled DFA states");

    StateLabels {
        mode,
        to_label,
        from_label,
    }
}

impl StateLabels {
    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_label.is_empty()
    }

    /// The label of a state.
    pub fn get(&self, state: &DfaState) -> Option<&Label> {
        self.to_label.get(state)
    }

    /// The state carrying a label.
    pub fn state(&self, label: &str) -> Option<&DfaState> {
        self.from_label.get(label)
    }

    /// The NFA states a label stands for.
    pub fn composition(&self, label: &str) -> Option<&[String]> {
        self.state(label).map(DfaState::members)
    }

    /// State to label, in canonical order.
    pub fn by_state(&self) -> &IndexMap<DfaState, Label> {
        &self.to_label
    }

    /// Label to state, in canonical order.
    pub fn by_label(&self) -> &IndexMap<Label, DfaState> {
        &self.from_label
    }

    /// Split into the `(state -> label, label -> state)` maps.
    pub fn into_maps(self) -> (IndexMap<DfaState, Label>, IndexMap<Label, DfaState>) {
        (self.to_label, self.from_label)
    }

    /// Iterate `(state, label)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&DfaState, &Label)> + '_ {
        self.to_label.iter()
    }

    /// Rewrite `dfa` in terms of labels. Fails if some state of `dfa` was
    /// not labeled by `self`.
    pub fn relabel(&self, dfa: &Dfa) -> Result<RelabeledTable> {
        let label_of = |id: StateId| -> Result<Label> {
            let state = dfa
                .state(id)
                .ok_or_else(|| AutomatonError::UnlabeledState(format!("#{id}")))?;
            self.get(state)
                .cloned()
                .ok_or_else(|| AutomatonError::UnlabeledState(state.to_string()))
        };

        let mut symbols: Vec<(&str, _)> = dfa
            .symbols()
            .iter()
            .map(|(id, token)| (token, id))
            .collect();
        symbols.sort_unstable();

        let mut rows = Vec::with_capacity(dfa.num_states());
        for (state, label) in self.iter() {
            let Some(id) = dfa.state_id(state) else {
                continue;
            };
            let targets = symbols
                .iter()
                .map(|&(_, symbol)| dfa.transition(id, symbol).map(label_of).transpose())
                .collect::<Result<Vec<_>>>()?;
            rows.push(TableRow {
                composition: state.to_string(),
                label: label.clone(),
                targets,
                is_initial: id == dfa.start_state(),
                is_final: dfa.is_final(id),
            });
        }
        if rows.len() != dfa.num_states() {
            let missing = dfa
                .states()
                .iter()
                .find(|state| self.get(state).is_none())
                .map_or_else(String::new, ToString::to_string);
            return Err(AutomatonError::UnlabeledState(missing));
        }

        let finals = rows
            .iter()
            .filter(|row| row.is_final)
            .map(|row| row.label.clone())
            .collect();

        Ok(RelabeledTable {
            symbols: symbols.into_iter().map(|(token, _)| token.to_owned()).collect(),
            initial: label_of(dfa.start_state())?,
            finals,
            rows,
        })
    }
}

/// One row of a relabeled transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// `{a, b}`, or `∅` for the dead state
    pub composition: String,
    pub label: Label,
    /// Target label per symbol, in the table's symbol order
    pub targets: Vec<Option<Label>>,
    pub is_initial: bool,
    pub is_final: bool,
}

/// A DFA transition table expressed with labels, rows in canonical order
/// and symbol columns sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelabeledTable {
    pub symbols: Vec<String>,
    pub rows: Vec<TableRow>,
    pub initial: Label,
    /// In canonical order
    pub finals: Vec<Label>,
}

impl RelabeledTable {
    /// The target label of `label` on `symbol`.
    pub fn target(&self, label: &str, symbol: &str) -> Option<&Label> {
        let column = self.symbols.iter().position(|s| s == symbol)?;
        self.rows
            .iter()
            .find(|row| row.label.as_str() == label)
            .and_then(|row| row.targets.get(column))
            .and_then(Option::as_ref)
    }
}
