//! CLI command implementations.

pub mod config;
pub mod orbit;
pub mod render;
