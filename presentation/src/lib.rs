//! Presentation layer for voter
//!
//! CLI argument definitions and console output formatting.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::{Cli, Command, OutputFormat};
pub use output::ConsoleFormatter;
