//! Symbol types for automata transitions.

use crate::automaton::error::{AutomatonError, Result};
use indexmap::IndexSet;

/// A symbol identifier represented as a u32.
/// The special value `EPSILON` represents an epsilon (empty) transition.
pub type SymbolId = u32;

/// Special symbol ID representing epsilon (empty) transitions.
/// We use u32::MAX as the epsilon marker.
pub const EPSILON: SymbolId = u32::MAX;

/// Check if a symbol is an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// The effective alphabet of an automaton: symbol tokens interned to ids in
/// the order they were first declared. Epsilon is never a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: IndexSet<String>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a symbol, returning its id. Interning an existing symbol
    /// returns the id it already has.
    pub fn intern(&mut self, symbol: &str) -> Result<SymbolId> {
        if symbol.is_empty() {
            return Err(AutomatonError::EmptySymbol);
        }
        if let Some(id) = self.id(symbol) {
            return Ok(id);
        }

        let id = self.symbols.len();
        // Reserve EPSILON (u32::MAX) for epsilon transitions
        if id >= EPSILON as usize {
            return Err(AutomatonError::TooManySymbols {
                max: EPSILON as usize,
            });
        }
        self.symbols.insert(symbol.to_owned());
        Ok(id as SymbolId)
    }

    /// Look up the id of a symbol.
    pub fn id(&self, symbol: &str) -> Option<SymbolId> {
        self.symbols.get_index_of(symbol).map(|i| i as SymbolId)
    }

    /// Look up the token of a symbol id. Epsilon has no token here.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        if is_epsilon(id) {
            None
        } else {
            self.symbols.get_index(id as usize).map(String::as_str)
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over `(id, token)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (i as SymbolId, s.as_str()))
    }

    /// Iterate over the symbol ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| i as SymbolId)
    }
}
