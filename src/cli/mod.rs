//! CLI layer for SummarAI.
//!
//! Provides the command-line interface using clap, with commands for
//! managing the database, the login session, and summarizing text.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, InputArgs};
