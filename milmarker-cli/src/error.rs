//! CLI error type and exit codes.

use std::fmt;

use milmarker::config::ConfigError;
use milmarker::SymbolError;

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// The symbol could not be rendered.
    Symbol(SymbolError),
    /// Configuration could not be loaded or saved.
    ConfigFile(ConfigError),
    /// Invalid configuration or command-line input.
    Config(String),
    /// Rasterizing the SVG markup failed.
    Raster(String),
    /// Writing output failed.
    Io(std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Symbol(_) => 2,
            CliError::Config(_) | CliError::ConfigFile(_) => 3,
            CliError::Raster(_) => 4,
            CliError::Io(_) => 5,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Symbol(e) => write!(f, "Symbol error: {}", e),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Raster(msg) => write!(f, "Rasterization failed: {}", msg),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Symbol(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Config(_) | CliError::Raster(_) => None,
        }
    }
}

impl From<SymbolError> for CliError {
    fn from(e: SymbolError) -> Self {
        CliError::Symbol(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
