//! Epsilon-NFA to DFA conversion.
//!
//! This module provides:
//! - Epsilon closure and symbol moves over an interned ε-NFA
//! - Subset construction (NFA to DFA conversion) with dead-state completion
//! - Canonical, discovery-order independent labels for DFA states
//! - PyO3 bindings for Python interoperability (`python` feature)

mod dfa;
mod epsilon_nfa;
mod error;
mod labeling;
mod options;
#[cfg(feature = "python")]
mod python_bindings;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::Dfa;
pub use epsilon_nfa::{EpsilonNfa, EpsilonNfaBuilder};
pub use error::{AutomatonError, Result, StateRole};
pub use labeling::{
    CanonicalKey, Label, NamingMode, RelabeledTable, StateLabels, TableRow, label,
    label_with_options,
};
pub use options::{ConversionOptions, DEFAULT_EPSILON, DEFAULT_OVERFLOW_PREFIX};
#[cfg(feature = "python")]
pub use python_bindings::automaton;
pub use state::{DfaState, StateId, StateSet, StateTable};
pub use subset_construction::{convert, convert_with_options, subset_construction};
pub use symbol::{EPSILON, SymbolId, SymbolTable, is_epsilon};
