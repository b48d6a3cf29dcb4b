//! Symbol identification codes.

use serde::{Deserialize, Serialize};

/// Encoding family of a symbol identification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeEncoding {
    /// Letter-coded form (e.g. `SFGPEWRH--MT`).
    Letter,
    /// Numeric form (e.g. `10031000161200000000`).
    Numeric,
}

impl CodeEncoding {
    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeEncoding::Letter => "letter",
            CodeEncoding::Numeric => "numeric",
        }
    }
}

/// An opaque symbol identification code (SIDC).
///
/// The marker pipeline treats the code as a cache-key component only; it is
/// never interpreted outside a [`Renderer`](crate::symbol::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCode(String);

impl SymbolCode {
    /// Wrap a code string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guess the encoding family from the characters used.
    ///
    /// All-digit codes are numeric; everything else is treated as letter-coded.
    pub fn encoding(&self) -> CodeEncoding {
        if !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit()) {
            CodeEncoding::Numeric
        } else {
            CodeEncoding::Letter
        }
    }
}

impl From<&str> for SymbolCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for SymbolCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for SymbolCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
