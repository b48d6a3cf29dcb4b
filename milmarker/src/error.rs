//! Error types for symbol rendering.

use thiserror::Error;

/// Result type for symbol operations.
pub type SymbolResult<T> = Result<T, SymbolError>;

/// Errors raised while turning a symbol code and options into a glyph.
///
/// These are the only user-visible failures of the marker pipeline. Updates
/// that race with marker tear-down are not errors and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    /// The renderer rejected the symbol identification code.
    #[error("Invalid symbol code '{code}': {reason}")]
    InvalidSymbolCode { code: String, reason: String },

    /// An option value cannot be used by the renderer.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}

impl SymbolError {
    /// Create an invalid symbol code error.
    pub fn invalid_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSymbolCode {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_code_display() {
        let err = SymbolError::invalid_code("XX", "too short");
        assert_eq!(err.to_string(), "Invalid symbol code 'XX': too short");
    }

    #[test]
    fn test_invalid_option_display() {
        let err = SymbolError::invalid_option("size", "must be positive");
        assert!(err.to_string().contains("size"));
        assert!(err.to_string().contains("must be positive"));
    }
}
