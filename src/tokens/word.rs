//! Word-boundary tokenizer.
//!
//! Splits text at Unicode word boundaries (UAX #29) using
//! `unicode-segmentation`. Every segment, including runs of whitespace and
//! punctuation, is one token, so tokens always concatenate back to the input.

use crate::error::BoxError;
use crate::tokens::{TokenCounter, Tokenizer};
use unicode_segmentation::UnicodeSegmentation;

/// Tokenizer yielding one token per Unicode word-boundary segment.
///
/// # Examples
///
/// ```
/// use ragkit::tokens::{Tokenizer, WordTokenizer};
///
/// let tokens = WordTokenizer::new().tokenize("foo bar").unwrap();
/// assert_eq!(tokens, vec!["foo", " ", "bar"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Creates a new word tokenizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TokenCounter for WordTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize, BoxError> {
        Ok(text.split_word_bounds().count())
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, BoxError> {
        Ok(text.split_word_bounds().map(ToString::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenizer_counts_segments() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(tokenizer.count_tokens("").unwrap(), 0);
        assert_eq!(tokenizer.count_tokens("foo bar bazzyfoo").unwrap(), 5);
    }

    #[test]
    fn test_word_tokenizer_is_lossless() {
        let text = "Hi, this is Jim.\n\nHi this is Joe!";
        let tokens = WordTokenizer::new().tokenize(text).unwrap();
        assert_eq!(tokens.concat(), text);
        assert_eq!(tokens.len(), WordTokenizer::new().count_tokens(text).unwrap());
    }
}
