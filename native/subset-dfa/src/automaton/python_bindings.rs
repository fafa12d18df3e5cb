//! PyO3 bindings for the automaton module.
//!
//! Exposes `convert`, which takes the parsed automaton description as plain
//! Python collections and returns a `Conversion` holding the DFA together
//! with its canonical labels.

use crate::automaton::dfa::Dfa;
use crate::automaton::error::AutomatonError;
use crate::automaton::labeling::{RelabeledTable, StateLabels, label_with_options};
use crate::automaton::options::ConversionOptions;
use crate::automaton::subset_construction::convert_with_options;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

impl From<AutomatonError> for PyErr {
    fn from(err: AutomatonError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// A converted automaton: the DFA plus its labeled transition table.
#[pyclass(name = "Conversion", module = "subset_dfa.automaton", frozen)]
pub struct PyConversion {
    dfa: Dfa,
    labels: StateLabels,
    table: RelabeledTable,
}

#[pymethods]
impl PyConversion {
    /// "numeric" or "alphabetic".
    #[getter]
    fn naming_mode(&self) -> String {
        self.labels.mode().to_string()
    }

    /// Label of the initial DFA state.
    #[getter]
    fn initial(&self) -> String {
        self.table.initial.to_string()
    }

    /// Labels of the final DFA states, in canonical order.
    #[getter]
    fn finals(&self) -> Vec<String> {
        self.table.finals.iter().map(ToString::to_string).collect()
    }

    /// Effective alphabet, sorted.
    #[getter]
    fn symbols(&self) -> Vec<String> {
        self.table.symbols.clone()
    }

    /// All labels, in canonical order.
    #[getter]
    fn labels(&self) -> Vec<String> {
        self.table.rows.iter().map(|row| row.label.to_string()).collect()
    }

    /// Table rows as `(composition, label, targets)`, one target label per
    /// symbol in `symbols` order.
    fn rows(&self) -> Vec<(String, String, Vec<Option<String>>)> {
        self.table
            .rows
            .iter()
            .map(|row| {
                (
                    row.composition.clone(),
                    row.label.to_string(),
                    row.targets
                        .iter()
                        .map(|target| target.as_ref().map(ToString::to_string))
                        .collect(),
                )
            })
            .collect()
    }

    /// `(label, symbol) -> label` for every transition.
    fn transitions(&self) -> HashMap<(String, String), String> {
        let mut map = HashMap::new();
        for row in &self.table.rows {
            for (symbol, target) in self.table.symbols.iter().zip(&row.targets) {
                if let Some(target) = target {
                    map.insert((row.label.to_string(), symbol.clone()), target.to_string());
                }
            }
        }
        map
    }

    /// NFA states the given label stands for, or None for an unknown label.
    fn composition(&self, label: &str) -> Option<Vec<String>> {
        self.labels.composition(label).map(<[String]>::to_vec)
    }

    /// Whether the DFA accepts the word (a sequence of symbols).
    fn accepts(&self, word: Vec<String>) -> bool {
        self.dfa.accepts(word)
    }

    fn __len__(&self) -> usize {
        self.dfa.num_states()
    }

    fn __repr__(&self) -> String {
        format!(
            "Conversion(states={}, symbols={:?}, initial={})",
            self.dfa.num_states(),
            self.table.symbols,
            self.table.initial
        )
    }
}

/// Python passes transitions keyed by `(symbol, source)`; the core takes
/// `(symbol, source, targets)` triples.
fn transition_triples(
    transitions: HashMap<(String, String), Vec<String>>,
) -> impl Iterator<Item = (String, String, Vec<String>)> {
    transitions
        .into_iter()
        .map(|((symbol, source), targets)| (symbol, source, targets))
}

/// Convert an epsilon-NFA description to a labeled DFA.
///
/// `transitions` maps `(symbol, state)` to the list of target states.
#[pyfunction]
#[pyo3(signature = (states, alphabet, transitions, initial, finals, epsilon = None))]
fn convert(
    states: Vec<String>,
    alphabet: Vec<String>,
    transitions: HashMap<(String, String), Vec<String>>,
    initial: &str,
    finals: Vec<String>,
    epsilon: Option<String>,
) -> PyResult<PyConversion> {
    let options = epsilon.map_or_else(ConversionOptions::default, ConversionOptions::with_epsilon);

    let dfa = convert_with_options(
        states,
        alphabet,
        transition_triples(transitions),
        initial,
        finals,
        &options,
    )?;
    let labels = label_with_options(dfa.states(), &options);
    let table = labels.relabel(&dfa)?;

    Ok(PyConversion { dfa, labels, table })
}

/// Register the automaton submodule.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConversion>()?;
    m.add_function(wrap_pyfunction!(convert, m)?)?;
    Ok(())
}
