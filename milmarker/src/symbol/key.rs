//! Cache keys for symbol instances.
//!
//! A [`CacheKey`] decides when a new glyph must be rendered. Two derivations
//! exist:
//!
//! - [`KeyStrategy::Canonical`] (default): option names are sorted before
//!   encoding, so `{fill, size}` and `{size, fill}` share a key.
//! - [`KeyStrategy::InsertionOrder`]: options are encoded in the order they
//!   were inserted. Semantically identical option sets built in a different
//!   order get different keys and therefore different glyphs. Kept for hosts
//!   that depend on the historical behaviour.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::code::SymbolCode;
use super::options::{OptionValue, SymbolOptions};

/// How option sets are encoded into cache keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Sort option names before encoding.
    #[default]
    Canonical,
    /// Encode options in insertion order.
    InsertionOrder,
}

impl KeyStrategy {
    /// Configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStrategy::Canonical => "canonical",
            KeyStrategy::InsertionOrder => "insertion_order",
        }
    }
}

impl std::fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "canonical" | "sorted" => Ok(KeyStrategy::Canonical),
            "insertion_order" | "insertion-order" | "ordered" => Ok(KeyStrategy::InsertionOrder),
            other => Err(format!(
                "unknown key strategy '{}' (expected canonical or insertion_order)",
                other
            )),
        }
    }
}

/// Identity of a `(code, options)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    code: SymbolCode,
    options: String,
}

impl CacheKey {
    /// Derive a key with the given strategy.
    pub fn derive(code: &SymbolCode, options: &SymbolOptions, strategy: KeyStrategy) -> Self {
        let options = match strategy {
            KeyStrategy::Canonical => {
                let mut entries: Vec<_> = options.iter().collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                encode_entries(entries)
            }
            KeyStrategy::InsertionOrder => encode_entries(options.iter()),
        };
        Self {
            code: code.clone(),
            options,
        }
    }

    /// Derive an order-independent key.
    pub fn canonical(code: &SymbolCode, options: &SymbolOptions) -> Self {
        Self::derive(code, options, KeyStrategy::Canonical)
    }

    /// The symbol code component.
    pub fn code(&self) -> &SymbolCode {
        &self.code
    }

    /// The encoded options component.
    pub fn options_repr(&self) -> &str {
        &self.options
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.code, self.options)
    }
}

/// Encode entries as a JSON object in the order given.
fn encode_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a OptionValue)>) -> String {
    let mut out = String::from("{");
    for (i, (name, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::Value::String(name.to_string()).to_string());
        out.push(':');
        out.push_str(&value.to_json().to_string());
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> SymbolCode {
        SymbolCode::from("SFG-UCI----D")
    }

    #[test]
    fn test_equal_inputs_equal_keys() {
        let a = SymbolOptions::new().with_size(35.0).with("fill", true);
        let b = SymbolOptions::new().with_size(35.0).with("fill", true);
        assert_eq!(CacheKey::canonical(&code(), &a), CacheKey::canonical(&code(), &b));
    }

    #[test]
    fn test_canonical_ignores_insertion_order() {
        let a = SymbolOptions::new().with("fill", true).with_size(35.0);
        let b = SymbolOptions::new().with_size(35.0).with("fill", true);
        assert_eq!(CacheKey::canonical(&code(), &a), CacheKey::canonical(&code(), &b));
    }

    #[test]
    fn test_insertion_order_strategy_is_order_sensitive() {
        let a = SymbolOptions::new().with("fill", true).with_size(35.0);
        let b = SymbolOptions::new().with_size(35.0).with("fill", true);
        assert_ne!(
            CacheKey::derive(&code(), &a, KeyStrategy::InsertionOrder),
            CacheKey::derive(&code(), &b, KeyStrategy::InsertionOrder)
        );
    }

    #[test]
    fn test_different_code_different_key() {
        let options = SymbolOptions::new().with_size(35.0);
        assert_ne!(
            CacheKey::canonical(&SymbolCode::from("SFG-UCI----D"), &options),
            CacheKey::canonical(&SymbolCode::from("SHG-UCIZ---D"), &options)
        );
    }

    #[test]
    fn test_value_types_are_distinguished() {
        let text = SymbolOptions::new().with("direction", "90");
        let number = SymbolOptions::new().with("direction", 90.0);
        assert_ne!(
            CacheKey::canonical(&code(), &text),
            CacheKey::canonical(&code(), &number)
        );
    }

    #[test]
    fn test_key_encoding_is_json() {
        let options = SymbolOptions::new().with_size(35.0).with("colorMode", "Dark");
        let key = CacheKey::canonical(&code(), &options);
        assert_eq!(key.options_repr(), r#"{"colorMode":"Dark","size":35.0}"#);
        assert_eq!(key.to_string(), r#"SFG-UCI----D|{"colorMode":"Dark","size":35.0}"#);
    }

    #[test]
    fn test_key_strategy_parse() {
        assert_eq!("canonical".parse::<KeyStrategy>(), Ok(KeyStrategy::Canonical));
        assert_eq!(
            "insertion_order".parse::<KeyStrategy>(),
            Ok(KeyStrategy::InsertionOrder)
        );
        assert!("random".parse::<KeyStrategy>().is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_canonical_key_independent_of_order(
                entries in proptest::collection::btree_map("[a-zA-Z]{1,12}", -1.0e6..1.0e6_f64, 0..8)
            ) {
                let forward: SymbolOptions = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let reverse: SymbolOptions = entries.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();

                prop_assert_eq!(
                    CacheKey::canonical(&code(), &forward),
                    CacheKey::canonical(&code(), &reverse)
                );
            }

            #[test]
            fn test_changing_a_value_changes_the_key(
                entries in proptest::collection::btree_map("[a-z]{1,8}", 0.0..1000.0_f64, 1..6),
                bump in 1.0..10.0_f64
            ) {
                let original: SymbolOptions = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let (first, value) = entries.iter().next().unwrap();
                let changed = original.clone().with(first.clone(), *value + bump);

                prop_assert_ne!(
                    CacheKey::canonical(&code(), &original),
                    CacheKey::canonical(&code(), &changed)
                );
            }
        }
    }
}
