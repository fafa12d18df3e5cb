//! Subset construction for epsilon-NFAs, with canonical DFA state labels.
//!
//! ```
//! use subset_dfa::{convert, label};
//!
//! let dfa = convert(
//!     ["0", "1", "2"],
//!     ["a", "b", "e"],
//!     [("e", "0", vec!["1"]), ("a", "1", vec!["1", "2"]), ("b", "2", vec!["2"])],
//!     "0",
//!     ["2"],
//! )?;
//! let labels = label(dfa.states());
//! let table = labels.relabel(&dfa)?;
//!
//! assert_eq!(labels.composition(table.initial.as_str()), Some(&["0".to_string(), "1".to_string()][..]));
//! assert!(dfa.accepts(["a", "b"]));
//! # Ok::<(), subset_dfa::AutomatonError>(())
//! ```

pub mod automaton;

pub use automaton::{
    AutomatonError, ConversionOptions, Dfa, DfaState, EpsilonNfa, Label, NamingMode,
    RelabeledTable, Result, StateLabels, TableRow, convert, convert_with_options, label,
    label_with_options, subset_construction,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn subset_dfa(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    let submodule = PyModule::new(py, "automaton")?;
    automaton::automaton(&submodule)?;

    // Make `import subset_dfa.automaton` work
    PyModule::import(py, "sys")?
        .getattr("modules")?
        .set_item("subset_dfa.automaton", &submodule)?;
    m.add_submodule(&submodule)
}
