//! Splitter configuration.
//!
//! One serde-friendly configuration struct covers every strategy; each
//! splitter reads the options that apply to it and ignores the rest. The
//! length function is resolved into a [`LengthFunction`] when a splitter is
//! constructed.

use crate::chunking::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::error::{CollaboratorError, ConfigError, Result};
use crate::io::unicode::{char_count, grapheme_count};
use crate::tokens::{TokenCounter, create_token_counter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Where a matched separator ends up after splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    /// Separators are dropped and re-inserted when pieces are joined.
    #[default]
    None,
    /// Separators are attached to the start of the following piece.
    Start,
    /// Separators are attached to the end of the preceding piece.
    End,
}

impl KeepSeparator {
    /// Returns `true` unless separators are dropped.
    #[must_use]
    pub const fn is_kept(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for KeepSeparator {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "false" => Ok(Self::None),
            "start" | "true" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(ConfigError::InvalidValue {
                reason: format!("keep_separator must be none, start or end, got {s}"),
            }),
        }
    }
}

/// How chunk length is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthKind {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// Extended grapheme clusters.
    Graphemes,
    /// UTF-8 bytes.
    Bytes,
    /// Tokens, as counted by the configured token counter.
    Tokens,
}

impl FromStr for LengthKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chars" | "characters" => Ok(Self::Chars),
            "graphemes" => Ok(Self::Graphemes),
            "bytes" => Ok(Self::Bytes),
            "tokens" => Ok(Self::Tokens),
            _ => Err(ConfigError::InvalidValue {
                reason: format!("unknown length function: {s}"),
            }),
        }
    }
}

/// A resolved length function.
#[derive(Clone)]
pub enum LengthFunction {
    /// Count Unicode scalar values.
    Chars,
    /// Count grapheme clusters.
    Graphemes,
    /// Count UTF-8 bytes.
    Bytes,
    /// Delegate to an injected token counter.
    Tokens(Arc<dyn TokenCounter>),
}

impl LengthFunction {
    /// Measures `text`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::TokenCounter`] if the injected counter fails.
    pub fn measure(&self, text: &str) -> Result<usize> {
        match self {
            Self::Chars => Ok(char_count(text)),
            Self::Graphemes => Ok(grapheme_count(text)),
            Self::Bytes => Ok(text.len()),
            Self::Tokens(counter) => counter
                .count_tokens(text)
                .map_err(|e| CollaboratorError::TokenCounter(e).into()),
        }
    }
}

impl Default for LengthFunction {
    fn default() -> Self {
        Self::Chars
    }
}

impl fmt::Debug for LengthFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars => f.write_str("Chars"),
            Self::Graphemes => f.write_str("Graphemes"),
            Self::Bytes => f.write_str("Bytes"),
            Self::Tokens(counter) => write!(f, "Tokens({})", counter.name()),
        }
    }
}

/// A markdown heading marker and the metadata label it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMarker {
    /// Line prefix, e.g. `"##"`.
    pub marker: String,
    /// Metadata key recorded for headings with this marker.
    pub label: String,
}

impl HeaderMarker {
    /// Creates a marker/label pair.
    #[must_use]
    pub fn new(marker: &str, label: &str) -> Self {
        Self {
            marker: marker.to_string(),
            label: label.to_string(),
        }
    }

    /// Heading level: the number of `#` characters in the marker. A marker
    /// without `#` is level 0 and closes every open heading.
    #[must_use]
    pub fn level(&self) -> usize {
        self.marker.chars().filter(|&c| c == '#').count()
    }
}

impl FromStr for HeaderMarker {
    type Err = ConfigError;

    /// Parses `MARKER=LABEL`, e.g. `##=Header 2`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((marker, label)) if !marker.trim().is_empty() && !label.trim().is_empty() => {
                Ok(Self::new(marker.trim(), label.trim()))
            }
            _ => Err(ConfigError::InvalidValue {
                reason: format!("header must look like MARKER=LABEL, got {s}"),
            }),
        }
    }
}

/// Configuration shared by all splitters.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::SplitterConfig;
///
/// let config = SplitterConfig::with_size_and_overlap(15, 3);
/// assert!(config.validate().is_ok());
/// assert!(SplitterConfig::with_size_and_overlap(10, 10).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Target maximum chunk length, measured by `length_function`.
    pub chunk_size: usize,

    /// Trailing length of one chunk repeated at the head of the next.
    pub chunk_overlap: usize,

    /// How length is measured.
    pub length_function: LengthKind,

    /// Built-in token counter used for token lengths and the token splitter.
    pub tokenizer: String,

    /// Separator for the character splitter.
    pub separator: String,

    /// Ordered separators for the recursive splitter, coarsest first.
    pub separators: Vec<String>,

    /// Separator placement; `None` picks the splitter's own default.
    pub keep_separator: Option<KeepSeparator>,

    /// Treat separators as regular expressions.
    pub is_separator_regex: bool,

    /// Trim whitespace around merged chunks.
    pub strip_whitespace: bool,

    /// Record each chunk's character offset under `start_index`.
    pub add_start_index: bool,

    /// Heading markers for the markdown splitter.
    pub headers_to_split_on: Vec<HeaderMarker>,

    /// Drop heading lines from markdown chunk content.
    pub strip_headers: bool,

    /// Emit one markdown chunk per content line.
    pub return_each_line: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            length_function: LengthKind::Chars,
            tokenizer: "heuristic".to_string(),
            separator: "\n\n".to_string(),
            separators: default_separators(),
            keep_separator: None,
            is_separator_regex: false,
            strip_whitespace: true,
            add_start_index: false,
            headers_to_split_on: default_headers(),
            strip_headers: true,
            return_each_line: false,
        }
    }
}

impl SplitterConfig {
    /// Creates a configuration with custom size and no overlap.
    #[must_use]
    pub fn with_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration with custom size and overlap.
    #[must_use]
    pub fn with_size_and_overlap(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    /// Sets the character splitter's separator.
    #[must_use]
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Sets the recursive splitter's separators.
    #[must_use]
    pub fn separators<S: AsRef<str>>(mut self, separators: &[S]) -> Self {
        self.separators = separators.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Sets separator placement.
    #[must_use]
    pub const fn keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.keep_separator = Some(keep);
        self
    }

    /// Treats separators as regular expressions.
    #[must_use]
    pub const fn separator_regex(mut self, is_regex: bool) -> Self {
        self.is_separator_regex = is_regex;
        self
    }

    /// Sets the length function.
    #[must_use]
    pub const fn length_function(mut self, kind: LengthKind) -> Self {
        self.length_function = kind;
        self
    }

    /// Sets whether merged chunks are trimmed.
    #[must_use]
    pub const fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    /// Sets whether chunks record their start offset.
    #[must_use]
    pub const fn add_start_index(mut self, add: bool) -> Self {
        self.add_start_index = add;
        self
    }

    /// Sets the markdown heading markers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<HeaderMarker>) -> Self {
        self.headers_to_split_on = headers;
        self
    }

    /// Sets whether heading lines are dropped from markdown chunks.
    #[must_use]
    pub const fn strip_headers(mut self, strip: bool) -> Self {
        self.strip_headers = strip;
        self
    }

    /// Sets whether markdown chunks are emitted per line.
    #[must_use]
    pub const fn return_each_line(mut self, each_line: bool) -> Self {
        self.return_each_line = each_line;
        self
    }

    /// Validates size and overlap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChunkSize`] or [`ConfigError::OverlapTooLarge`].
    pub const fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// Resolves the configured length function.
    ///
    /// # Errors
    ///
    /// Returns an error if `length_function` is `tokens` and the configured
    /// tokenizer name is unknown.
    pub fn resolve_length_function(&self) -> Result<LengthFunction> {
        Ok(match self.length_function {
            LengthKind::Chars => LengthFunction::Chars,
            LengthKind::Graphemes => LengthFunction::Graphemes,
            LengthKind::Bytes => LengthFunction::Bytes,
            LengthKind::Tokens => {
                let counter: Arc<dyn TokenCounter> = create_token_counter(&self.tokenizer)?;
                LengthFunction::Tokens(counter)
            }
        })
    }
}

/// Default recursive separators: paragraph, line, word, character.
#[must_use]
pub fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""].iter().map(ToString::to_string).collect()
}

/// Default markdown markers: `#`, `##`, `###` as `Header 1..3`.
#[must_use]
pub fn default_headers() -> Vec<HeaderMarker> {
    vec![
        HeaderMarker::new("#", "Header 1"),
        HeaderMarker::new("##", "Header 2"),
        HeaderMarker::new("###", "Header 3"),
    ]
}
