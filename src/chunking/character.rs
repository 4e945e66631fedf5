//! Single-separator splitting.
//!
//! Cuts text at one separator, then packs the pieces with
//! [`ChunkPacker::merge_splits`]. Pieces longer than `chunk_size` are not
//! split further.

use crate::chunking::config::{KeepSeparator, LengthFunction, SplitterConfig};
use crate::chunking::merge::{ChunkPacker, Separator};
use crate::chunking::traits::TextSplitter;
use crate::error::Result;

/// Splitter that cuts at a single separator.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{CharacterSplitter, SplitterConfig, TextSplitter};
///
/// let config = SplitterConfig::with_size(7).separator(" ");
/// let splitter = CharacterSplitter::new(&config).unwrap();
/// let chunks = splitter.split_text("foo bar baz 123").unwrap();
/// assert_eq!(chunks, vec!["foo bar", "baz 123"]);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterSplitter {
    packer: ChunkPacker,
    separator: Separator,
    keep: KeepSeparator,
    add_start_index: bool,
}

impl CharacterSplitter {
    /// Creates a splitter from configuration.
    ///
    /// Separator placement defaults to [`KeepSeparator::None`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid size/overlap or a separator
    /// regex that does not compile.
    pub fn new(config: &SplitterConfig) -> Result<Self> {
        Ok(Self {
            packer: ChunkPacker::from_config(config)?,
            separator: Separator::compile(&config.separator, config.is_separator_regex)?,
            keep: config.keep_separator.unwrap_or(KeepSeparator::None),
            add_start_index: config.add_start_index,
        })
    }

    /// Replaces the length function, e.g. with an injected token counter.
    #[must_use]
    pub fn with_length_function(mut self, length: LengthFunction) -> Self {
        self.packer = self.packer.with_length_function(length);
        self
    }
}

impl TextSplitter for CharacterSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        let pieces = self.separator.split(text, self.keep);
        self.packer
            .merge_splits(&pieces, self.separator.glue(self.keep))
    }

    fn name(&self) -> &'static str {
        "character"
    }

    fn description(&self) -> &'static str {
        "Splits at a single separator and packs pieces up to the chunk size"
    }

    fn add_start_index(&self) -> bool {
        self.add_start_index
    }
}
