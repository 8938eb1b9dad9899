//! CLI layer for the pizza review agent.
//!
//! Provides the command-line interface using clap: one-shot questions,
//! an interactive session, and a dataset overview.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::Cli;
