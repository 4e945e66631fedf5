//! Token counting collaborators.
//!
//! Token counting is injected, never hard-wired: the splitters and the
//! token-budgeted memories only see the [`TokenCounter`] and [`Tokenizer`]
//! traits. Two deterministic implementations ship with the crate for offline
//! use and tests:
//!
//! - [`HeuristicTokenCounter`]: ~4 bytes per token, rounded up
//! - [`WordTokenizer`]: Unicode word-boundary segments, one token each

mod heuristic;
mod word;

pub use heuristic::HeuristicTokenCounter;
pub use word::WordTokenizer;

use crate::error::{BoxError, ConfigError, Result};
use std::sync::Arc;

/// Counts tokens in a piece of text.
///
/// Implementations must be deterministic for a fixed model/encoding and
/// thread-safe (`Send + Sync`) so splitters holding one stay shareable.
///
/// # Examples
///
/// ```
/// use ragkit::tokens::{HeuristicTokenCounter, TokenCounter};
///
/// let counter = HeuristicTokenCounter::new();
/// assert_eq!(counter.count_tokens("hello").unwrap(), 2);
/// ```
pub trait TokenCounter: Send + Sync {
    /// Returns the number of tokens in `text`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error if counting fails.
    fn count_tokens(&self, text: &str) -> std::result::Result<usize, BoxError>;

    /// Returns the name of the counter.
    fn name(&self) -> &'static str;
}

/// Splits text into tokens.
///
/// Concatenating the returned tokens must reproduce the input exactly, so a
/// window of tokens decodes back to a substring of the text.
pub trait Tokenizer: TokenCounter {
    /// Tokenizes `text`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's own error if tokenization fails.
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, BoxError>;
}

/// Adapts a closure into a [`TokenCounter`].
///
/// # Examples
///
/// ```
/// use ragkit::tokens::{FnTokenCounter, TokenCounter};
///
/// let words = FnTokenCounter::new(|text| Ok(text.split_whitespace().count()));
/// assert_eq!(words.count_tokens("a b c").unwrap(), 3);
/// ```
pub struct FnTokenCounter<F> {
    count: F,
}

impl<F> FnTokenCounter<F>
where
    F: Fn(&str) -> std::result::Result<usize, BoxError> + Send + Sync,
{
    /// Wraps the given counting function.
    pub const fn new(count: F) -> Self {
        Self { count }
    }
}

impl<F> TokenCounter for FnTokenCounter<F>
where
    F: Fn(&str) -> std::result::Result<usize, BoxError> + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> std::result::Result<usize, BoxError> {
        (self.count)(text)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Creates a built-in token counter by name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the name is not recognized.
pub fn create_token_counter(name: &str) -> Result<Arc<dyn Tokenizer>> {
    match name.to_lowercase().as_str() {
        "heuristic" => Ok(Arc::new(HeuristicTokenCounter::new())),
        "word" | "words" => Ok(Arc::new(WordTokenizer::new())),
        _ => Err(ConfigError::InvalidValue {
            reason: format!("unknown token counter: {name}"),
        }
        .into()),
    }
}

/// Lists available built-in token counter names.
#[must_use]
pub fn available_token_counters() -> Vec<&'static str> {
    vec!["heuristic", "word"]
}
