//! Text splitting strategies.
//!
//! This module provides a trait-based system for splitting documents into
//! chunks sized for an LLM context window. Multiple strategies are available:
//!
//! - **Character**: cut at one separator, pack pieces up to the chunk size
//! - **Recursive**: descend a separator hierarchy until every piece fits
//! - **Token**: fixed windows over an injected tokenizer's tokens
//! - **Markdown**: partition by headings, recording the heading path
//! - **Parallel**: orchestrator splitting many documents across threads

pub mod character;
pub mod config;
pub mod markdown;
pub mod merge;
pub mod parallel;
pub mod recursive;
pub mod token;
pub mod traits;

pub use character::CharacterSplitter;
pub use config::{
    HeaderMarker, KeepSeparator, LengthFunction, LengthKind, SplitterConfig, default_headers,
    default_separators,
};
pub use markdown::MarkdownHeaderSplitter;
pub use merge::{ChunkPacker, Separator};
pub use parallel::ParallelSplitter;
pub use recursive::RecursiveSplitter;
pub use token::TokenSplitter;
pub use traits::TextSplitter;

use crate::error::{ConfigError, Result};

/// Default chunk size, measured by the configured length function.
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Default overlap between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Creates the default splitter (recursive, default configuration).
///
/// # Errors
///
/// Never fails for the default configuration; the `Result` mirrors
/// [`RecursiveSplitter::new`].
pub fn default_splitter() -> Result<RecursiveSplitter> {
    RecursiveSplitter::new(&SplitterConfig::default())
}

/// Creates a splitter by name.
///
/// # Arguments
///
/// * `name` - Strategy name: "character", "recursive", "token", or "markdown".
/// * `config` - Options; each strategy reads the ones that apply to it.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownStrategy`] if the strategy name is not
/// recognized, or the strategy's own construction error.
pub fn create_splitter(name: &str, config: &SplitterConfig) -> Result<Box<dyn TextSplitter>> {
    match name.to_lowercase().as_str() {
        "character" => Ok(Box::new(CharacterSplitter::new(config)?)),
        "recursive" => Ok(Box::new(RecursiveSplitter::new(config)?)),
        "token" => Ok(Box::new(TokenSplitter::from_config(config)?)),
        "markdown" => Ok(Box::new(MarkdownHeaderSplitter::new(config)?)),
        _ => Err(ConfigError::UnknownStrategy {
            name: name.to_string(),
        }
        .into()),
    }
}

/// Lists available splitting strategy names.
#[must_use]
pub fn available_strategies() -> Vec<&'static str> {
    vec!["character", "recursive", "token", "markdown"]
}
