//! CLI layer for ragkit.
//!
//! Provides the command-line interface using clap, with commands for
//! splitting files into chunks and replaying transcripts through memory.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, MemoryArgs, SplitArgs};
