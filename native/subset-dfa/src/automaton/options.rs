//! Conversion options.

use serde::{Deserialize, Serialize};

/// Token conventionally used for epsilon in automaton descriptions.
pub const DEFAULT_EPSILON: &str = "e";

/// Prefix of alphabetic labels once `A`..`Z` are used up.
pub const DEFAULT_OVERFLOW_PREFIX: char = 'Z';

/// Knobs for [`convert_with_options`](crate::automaton::convert_with_options)
/// and [`label_with_options`](crate::automaton::label_with_options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Symbol token that denotes an epsilon transition.
    pub epsilon: String,
    /// Cache the epsilon closure of every NFA state before construction.
    pub precompute_closures: bool,
    /// Alphabetic labels past `Z` are this prefix followed by 1, 2, ...
    pub overflow_prefix: char,
}

impl ConversionOptions {
    /// Options with a different epsilon token.
    pub fn with_epsilon(epsilon: impl Into<String>) -> Self {
        Self {
            epsilon: epsilon.into(),
            ..Self::default()
        }
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON.to_string(),
            precompute_closures: true,
            overflow_prefix: DEFAULT_OVERFLOW_PREFIX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConversionOptions::default();
        assert_eq!(options.epsilon, "e");
        assert!(options.precompute_closures);
        assert_eq!(options.overflow_prefix, 'Z');
    }

    #[test]
    fn test_with_epsilon_keeps_other_defaults() {
        let options = ConversionOptions::with_epsilon("ε");
        assert_eq!(options.epsilon, "ε");
        assert_eq!(options.overflow_prefix, DEFAULT_OVERFLOW_PREFIX);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let options: ConversionOptions =
            serde_json::from_str(r#"{ "epsilon": "λ", "precompute_closures": false }"#).unwrap();
        assert_eq!(options.epsilon, "λ");
        assert!(!options.precompute_closures);
        assert_eq!(options.overflow_prefix, 'Z');

        let json = serde_json::to_string(&ConversionOptions::default()).unwrap();
        let parsed: ConversionOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ConversionOptions::default());
    }
}
