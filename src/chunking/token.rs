//! Token-window splitting.
//!
//! Tokenizes the whole text with an injected [`Tokenizer`] and emits windows
//! of `chunk_size` tokens, each starting `chunk_size - chunk_overlap` tokens
//! after the previous one.

use crate::chunking::config::SplitterConfig;
use crate::chunking::traits::TextSplitter;
use crate::error::{CollaboratorError, Result};
use crate::tokens::{Tokenizer, create_token_counter};
use std::fmt;
use std::sync::Arc;

/// Splitter that windows over tokens.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{SplitterConfig, TextSplitter, TokenSplitter};
/// use ragkit::tokens::WordTokenizer;
/// use std::sync::Arc;
///
/// let config = SplitterConfig::with_size_and_overlap(3, 1);
/// let splitter = TokenSplitter::new(&config, Arc::new(WordTokenizer::new())).unwrap();
/// let chunks = splitter.split_text("a b c d").unwrap();
/// assert_eq!(chunks, vec!["a b", "b c", "c d"]);
/// ```
#[derive(Clone)]
pub struct TokenSplitter {
    tokenizer: Arc<dyn Tokenizer>,
    chunk_size: usize,
    chunk_overlap: usize,
    add_start_index: bool,
}

impl TokenSplitter {
    /// Creates a splitter around an injected tokenizer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid size/overlap.
    pub fn new(config: &SplitterConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            add_start_index: config.add_start_index,
        })
    }

    /// Creates a splitter using the built-in tokenizer named in `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid size/overlap or an unknown
    /// tokenizer name.
    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        Self::new(config, create_token_counter(&config.tokenizer)?)
    }
}

impl fmt::Debug for TokenSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSplitter")
            .field("tokenizer", &self.tokenizer.name())
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .finish_non_exhaustive()
    }
}

impl TextSplitter for TokenSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        let tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(CollaboratorError::Tokenizer)?;

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < tokens.len() {
            let end = (start + self.chunk_size).min(tokens.len());
            chunks.push(tokens[start..end].concat());
            if end == tokens.len() {
                break;
            }
            start += step;
        }
        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "token"
    }

    fn description(&self) -> &'static str {
        "Fixed-size windows of tokens from an injected tokenizer"
    }

    fn add_start_index(&self) -> bool {
        self.add_start_index
    }
}
