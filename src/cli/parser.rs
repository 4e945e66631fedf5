//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::chunking::{HeaderMarker, KeepSeparator, LengthKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragkit: text chunking and conversation memory for LLM pipelines.
///
/// Splits documents into chunks sized for a context window, and replays
/// chat transcripts through bounded conversation memories.
#[derive(Parser, Debug)]
#[command(name = "ragkit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a file into chunks.
    Split(SplitArgs),

    /// Replay a transcript through a conversation memory.
    ///
    /// The transcript is a JSON array of `{"input": ..., "output": ...}`
    /// objects; the rendered memory after the last turn is printed.
    Memory(MemoryArgs),

    /// List splitting strategies, memory policies, and token counters.
    Strategies,
}

/// Arguments of the `split` command.
///
/// Flags override values read from `--config`.
#[derive(clap::Args, Debug, Default)]
pub struct SplitArgs {
    /// Path to the input file.
    pub file: PathBuf,

    /// Splitting strategy (character, recursive, token, markdown).
    #[arg(short, long, default_value = "recursive")]
    pub strategy: String,

    /// Maximum chunk length, measured by `--length`.
    #[arg(long, env = "RAGKIT_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks.
    #[arg(long, env = "RAGKIT_CHUNK_OVERLAP")]
    pub chunk_overlap: Option<usize>,

    /// Separator for the character strategy (escapes like `\n` allowed).
    #[arg(long)]
    pub separator: Option<String>,

    /// Separator hierarchy for the recursive strategy, coarsest first.
    #[arg(long, num_args = 1..)]
    pub separators: Vec<String>,

    /// Treat separators as regular expressions.
    #[arg(long)]
    pub regex: bool,

    /// Where matched separators go (none, start, end).
    #[arg(long)]
    pub keep_separator: Option<KeepSeparator>,

    /// Length function (chars, graphemes, bytes, tokens).
    #[arg(long)]
    pub length: Option<LengthKind>,

    /// Token counter for `--length tokens` and the token strategy.
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Record each chunk's character offset as `start_index`.
    #[arg(long)]
    pub add_start_index: bool,

    /// Markdown header to split on, as `MARKER=LABEL` (repeatable).
    #[arg(long = "header")]
    pub headers: Vec<HeaderMarker>,

    /// Keep header lines in markdown chunk content.
    #[arg(long)]
    pub keep_headers: bool,

    /// Emit every markdown line as its own chunk.
    #[arg(long)]
    pub each_line: bool,

    /// Read the file as a JSON array of documents.
    #[arg(long)]
    pub documents: bool,

    /// JSON file with splitter options.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write chunks to files in this directory.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Filename prefix for `--out-dir`.
    #[arg(long, default_value = "chunk")]
    pub prefix: String,
}

/// Arguments of the `memory` command.
///
/// Flags override values read from `--config`.
#[derive(clap::Args, Debug, Default)]
pub struct MemoryArgs {
    /// Path to the transcript JSON file.
    pub transcript: PathBuf,

    /// Memory policy (buffer, window, token, summary).
    #[arg(short, long, env = "RAGKIT_MEMORY_POLICY")]
    pub policy: Option<String>,

    /// Window size for the window policy.
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Token budget for the token and summary policies.
    #[arg(long)]
    pub max_token_limit: Option<usize>,

    /// Token counter (heuristic, word).
    #[arg(long, default_value = "heuristic")]
    pub tokenizer: String,

    /// Prefix for human lines.
    #[arg(long)]
    pub human_prefix: Option<String>,

    /// Prefix for AI lines.
    #[arg(long)]
    pub ai_prefix: Option<String>,

    /// JSON file with memory options.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
