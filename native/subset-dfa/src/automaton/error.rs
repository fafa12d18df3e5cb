//! Errors raised while building an automaton from its description.

use std::fmt;

/// Where an undeclared state name was referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRole {
    TransitionSource,
    TransitionTarget,
    Final,
}

impl fmt::Display for StateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateRole::TransitionSource => "transition source",
            StateRole::TransitionTarget => "transition target",
            StateRole::Final => "final state",
        })
    }
}

/// Automaton construction and labeling errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    /// No initial state was given
    #[error("no initial state was given")]
    MissingInitialState,

    /// Initial state is not among the declared states
    #[error("initial state `{0}` is not a declared state")]
    UnknownInitialState(String),

    /// A transition or final state references an undeclared state
    #[error("{role} `{name}` is not a declared state")]
    UnknownState {
        /// The undeclared name
        name: String,
        /// Where it was referenced
        role: StateRole,
    },

    #[error("state names must not be empty")]
    EmptyStateName,

    #[error("symbols must not be empty")]
    EmptySymbol,

    #[error("too many states: at most {max} are supported")]
    TooManyStates { max: usize },

    #[error("too many symbols: at most {max} are supported")]
    TooManySymbols { max: usize },

    /// A DFA state has no label in the label set it was relabeled with
    #[error("DFA state {0} has no label")]
    UnlabeledState(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AutomatonError>;
