//! Separator splitting and size-bounded merging.
//!
//! Every separator-based splitter works in two steps: cut the text at a
//! separator ([`Separator::split`]), then greedily pack the pieces back into
//! chunks no longer than `chunk_size`, carrying a tail of each chunk into the
//! next one as overlap ([`ChunkPacker::merge_splits`]).

use crate::chunking::config::{KeepSeparator, LengthFunction, SplitterConfig};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::VecDeque;
use tracing::warn;

/// A compiled separator.
#[derive(Debug, Clone)]
pub enum Separator {
    /// The empty separator: split into individual characters.
    Empty,
    /// A literal string.
    Literal(String),
    /// A regular expression.
    Pattern(Regex),
}

impl Separator {
    /// Compiles a separator, treating it as a regex when `is_regex` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeparator`] if the pattern does not compile.
    pub fn compile(raw: &str, is_regex: bool) -> std::result::Result<Self, ConfigError> {
        if raw.is_empty() {
            return Ok(Self::Empty);
        }
        if !is_regex {
            return Ok(Self::Literal(raw.to_string()));
        }
        Regex::new(raw)
            .map(Self::Pattern)
            .map_err(|e| ConfigError::InvalidSeparator {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns `true` for the empty separator.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the separator occurs in `text`. The empty separator
    /// always matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Empty => true,
            Self::Literal(literal) => text.contains(literal.as_str()),
            Self::Pattern(regex) => regex.is_match(text),
        }
    }

    /// Text used to glue pieces back together during merging.
    ///
    /// Kept separators already live inside the pieces, so the glue is empty.
    /// Regex matches vary, so a discarded regex separator also glues with
    /// the empty string.
    #[must_use]
    pub fn glue(&self, keep: KeepSeparator) -> &str {
        match self {
            Self::Literal(literal) if !keep.is_kept() => literal.as_str(),
            _ => "",
        }
    }

    fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        match self {
            Self::Empty => Vec::new(),
            Self::Literal(literal) => text
                .match_indices(literal.as_str())
                .map(|(start, m)| (start, start + m.len()))
                .collect(),
            Self::Pattern(regex) => regex.find_iter(text).map(|m| (m.start(), m.end())).collect(),
        }
    }

    /// Splits `text` at every occurrence, placing matches according to
    /// `keep`. Empty pieces are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragkit::chunking::{KeepSeparator, Separator};
    ///
    /// let sep = Separator::compile(", ", false).unwrap();
    /// assert_eq!(sep.split("a, b", KeepSeparator::None), vec!["a", "b"]);
    /// assert_eq!(sep.split("a, b", KeepSeparator::Start), vec!["a", ", b"]);
    /// assert_eq!(sep.split("a, b", KeepSeparator::End), vec!["a, ", "b"]);
    /// ```
    #[must_use]
    pub fn split(&self, text: &str, keep: KeepSeparator) -> Vec<String> {
        if self.is_empty() {
            return text.chars().map(String::from).collect();
        }

        let mut pieces = Vec::new();
        let mut last = 0;
        for (start, end) in self.spans(text) {
            let (piece_end, next_start) = match keep {
                KeepSeparator::None => (start, end),
                KeepSeparator::Start => (start, start),
                KeepSeparator::End => (end, end),
            };
            if piece_end > last {
                pieces.push(text[last..piece_end].to_string());
            }
            last = next_start.max(last);
        }
        if last < text.len() {
            pieces.push(text[last..].to_string());
        }
        pieces
    }
}

/// Greedy packer shared by the separator-based splitters.
#[derive(Debug, Clone)]
pub struct ChunkPacker {
    chunk_size: usize,
    chunk_overlap: usize,
    length: LengthFunction,
    strip_whitespace: bool,
}

impl ChunkPacker {
    /// Builds a packer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the size/overlap pair is invalid or the length
    /// function cannot be resolved.
    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            length: config.resolve_length_function()?,
            strip_whitespace: config.strip_whitespace,
        })
    }

    /// Replaces the length function.
    #[must_use]
    pub fn with_length_function(mut self, length: LengthFunction) -> Self {
        self.length = length;
        self
    }

    /// Maximum chunk length.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive chunks.
    #[must_use]
    pub const fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Measures `text` with the configured length function.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error if the length function fails.
    pub fn measure(&self, text: &str) -> Result<usize> {
        self.length.measure(text)
    }

    /// Packs pieces into chunks of at most `chunk_size`, joined by `glue`.
    ///
    /// When a chunk is closed, the next one starts from the shortest tail of
    /// the closed chunk's pieces covering `chunk_overlap`, minus any leading
    /// pieces that would push the next chunk past `chunk_size`. A single piece
    /// longer than `chunk_size` is emitted as its own oversized chunk and a
    /// warning is logged.
    ///
    /// # Errors
    ///
    /// Returns a collaborator error if the length function fails.
    pub fn merge_splits<S: AsRef<str>>(&self, splits: &[S], glue: &str) -> Result<Vec<String>> {
        let glue_len = self.measure(glue)?;
        let mut docs = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let piece = split.as_ref();
            let len = self.measure(piece)?;
            let joined_glue = if window.is_empty() { 0 } else { glue_len };

            if total + joined_glue + len > self.chunk_size && !window.is_empty() {
                if total > self.chunk_size {
                    warn!(
                        length = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the specified size"
                    );
                }
                if let Some(doc) = self.join(&window, glue) {
                    docs.push(doc);
                }

                while let Some(&(_, front_len)) = window.front() {
                    let front_glue = if window.len() > 1 { glue_len } else { 0 };
                    let rest = total.saturating_sub(front_len + front_glue);
                    let fits = total + glue_len + len <= self.chunk_size;
                    if fits && rest < self.chunk_overlap {
                        break;
                    }
                    window.pop_front();
                    total = rest;
                }
            }

            window.push_back((piece, len));
            total += len + if window.len() > 1 { glue_len } else { 0 };
        }

        if total > self.chunk_size {
            warn!(
                length = total,
                chunk_size = self.chunk_size,
                "created a chunk longer than the specified size"
            );
        }
        if let Some(doc) = self.join(&window, glue) {
            docs.push(doc);
        }
        Ok(docs)
    }

    /// Joins a window of pieces, trimming if configured. Returns `None` for
    /// chunks that end up empty.
    fn join(&self, window: &VecDeque<(&str, usize)>, glue: &str) -> Option<String> {
        let joined = window.iter().map(|(s, _)| *s).collect::<Vec<_>>().join(glue);
        let text = if self.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };
        (!text.is_empty()).then_some(text)
    }
}
