//! Recursive separator-hierarchy splitting.
//!
//! Tries separators from coarsest to finest. The first separator that occurs
//! in the text is used to cut it; pieces that fit are packed, pieces that do
//! not are cut again with the remaining, finer separators. The last
//! separator must be `""`, which cuts into single characters, so every
//! piece can eventually be made to fit.
//!
//! The descent runs on an explicit work stack, not call recursion.

use crate::chunking::config::{KeepSeparator, LengthFunction, SplitterConfig};
use crate::chunking::merge::{ChunkPacker, Separator};
use crate::chunking::traits::TextSplitter;
use crate::error::{Error, Result};
use tracing::{trace, warn};

/// Pending work for the splitter.
#[derive(Debug)]
enum Task {
    /// Cut `text` using separators from index `level` onwards.
    Split { text: String, level: usize },
    /// Pack pieces cut with the separator at `separator`.
    Merge {
        pieces: Vec<String>,
        separator: usize,
    },
    /// Emit an oversized piece that no finer separator can cut.
    Emit(String),
}

/// Splitter that descends a separator hierarchy.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{RecursiveSplitter, SplitterConfig, TextSplitter};
///
/// let config = SplitterConfig::with_size_and_overlap(15, 3).separators(&[""]);
/// let splitter = RecursiveSplitter::new(&config).unwrap();
/// let chunks = splitter.split_text("abcdefghijklmnopqrstuvwxyz").unwrap();
/// assert_eq!(chunks, vec!["abcdefghijklmno", "mnopqrstuvwxyz"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    packer: ChunkPacker,
    separators: Vec<Separator>,
    keep: KeepSeparator,
    add_start_index: bool,
}

impl RecursiveSplitter {
    /// Creates a splitter from configuration.
    ///
    /// Separator placement defaults to [`KeepSeparator::Start`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] unless `""` appears exactly once,
    /// as the last separator. Returns a configuration error for invalid
    /// size/overlap or a separator regex that does not compile.
    pub fn new(config: &SplitterConfig) -> Result<Self> {
        check_separators(&config.separators)?;
        let separators = config
            .separators
            .iter()
            .map(|raw| Separator::compile(raw, config.is_separator_regex))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            packer: ChunkPacker::from_config(config)?,
            separators,
            keep: config.keep_separator.unwrap_or(KeepSeparator::Start),
            add_start_index: config.add_start_index,
        })
    }

    /// Replaces the length function, e.g. with an injected token counter.
    #[must_use]
    pub fn with_length_function(mut self, length: LengthFunction) -> Self {
        self.packer = self.packer.with_length_function(length);
        self
    }

    /// Picks the separator for `text` starting at `level`.
    ///
    /// Returns the chosen index and the level finer pieces continue from.
    /// The empty separator leaves nothing finer to try.
    fn select(&self, text: &str, level: usize) -> (usize, usize) {
        let last = self.separators.len() - 1;
        for (i, separator) in self.separators.iter().enumerate().skip(level) {
            if separator.is_empty() {
                return (i, self.separators.len());
            }
            if separator.is_match(text) {
                return (i, i + 1);
            }
        }
        (last, self.separators.len())
    }

    /// Cuts `text` and plans the follow-up tasks in document order.
    fn plan(&self, text: &str, level: usize) -> Result<Vec<Task>> {
        let (chosen, next_level) = self.select(text, level);
        let pieces = self.separators[chosen].split(text, self.keep);
        trace!(level = chosen, pieces = pieces.len(), "cut text");

        let mut tasks = Vec::new();
        let mut fitting = Vec::new();
        for piece in pieces {
            if self.packer.measure(&piece)? <= self.packer.chunk_size() {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                tasks.push(Task::Merge {
                    pieces: std::mem::take(&mut fitting),
                    separator: chosen,
                });
            }
            if next_level < self.separators.len() {
                tasks.push(Task::Split {
                    text: piece,
                    level: next_level,
                });
            } else {
                tasks.push(Task::Emit(piece));
            }
        }
        if !fitting.is_empty() {
            tasks.push(Task::Merge {
                pieces: fitting,
                separator: chosen,
            });
        }
        Ok(tasks)
    }
}

/// Checks that `""` is present exactly once, at the end.
fn check_separators(separators: &[String]) -> Result<()> {
    match separators.iter().position(String::is_empty) {
        Some(i) if i + 1 == separators.len() => Ok(()),
        Some(i) => Err(Error::InvariantViolation {
            message: format!("empty separator must be last, found at position {i}"),
        }),
        None => Err(Error::InvariantViolation {
            message: "separators must end with the empty separator \"\"".to_string(),
        }),
    }
}

impl TextSplitter for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        let mut stack = vec![Task::Split {
            text: text.to_string(),
            level: 0,
        }];

        while let Some(task) = stack.pop() {
            match task {
                Task::Split { text, level } => {
                    let planned = self.plan(&text, level)?;
                    stack.extend(planned.into_iter().rev());
                }
                Task::Merge { pieces, separator } => {
                    let glue = self.separators[separator].glue(self.keep);
                    chunks.extend(self.packer.merge_splits(&pieces, glue)?);
                }
                Task::Emit(piece) => {
                    warn!(
                        chunk_size = self.packer.chunk_size(),
                        "piece cannot be split further and exceeds the chunk size"
                    );
                    chunks.push(piece);
                }
            }
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Splits by paragraphs, then lines, then words, then characters until chunks fit"
    }

    fn add_start_index(&self) -> bool {
        self.add_start_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::config::LengthKind;
    use crate::core::Document;
    use test_case::test_case;

    fn splitter(config: &SplitterConfig) -> RecursiveSplitter {
        RecursiveSplitter::new(config).unwrap()
    }

    #[test]
    fn test_alphabet_with_overlap() {
        let config = SplitterConfig::with_size_and_overlap(15, 3).separators(&[""]);
        let chunks = splitter(&config)
            .split_text("abcdefghijklmnopqrstuvwxyz")
            .unwrap();
        assert_eq!(chunks, vec!["abcdefghijklmno", "mnopqrstuvwxyz"]);
    }

    #[test]
    fn test_short_text_single_chunk() {
        let config = SplitterConfig::with_size(100);
        let chunks = splitter(&config).split_text("Hello world").unwrap();
        assert_eq!(chunks, vec!["Hello world"]);
    }

    #[test]
    fn test_empty_text() {
        let config = SplitterConfig::with_size(10);
        assert!(splitter(&config).split_text("").unwrap().is_empty());
    }

    #[test]
    fn test_descends_to_words() {
        let config = SplitterConfig::with_size(10);
        let text = "Hi.\n\nI'm Harrison.\n\nHow?";
        let chunks = splitter(&config).split_text(text).unwrap();
        assert_eq!(chunks, vec!["Hi.", "I'm", "Harrison.", "How?"]);
    }

    #[test]
    fn test_paragraphs_packed_with_start_separator() {
        let config = SplitterConfig::with_size(12);
        let chunks = splitter(&config).split_text("aaaa\n\nbbbb\n\ncccc").unwrap();
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc"]);
    }

    #[test]
    fn test_keep_separator_none_reinserts_literal() {
        let config = SplitterConfig::with_size(12).keep_separator(KeepSeparator::None);
        let chunks = splitter(&config).split_text("aaaa\n\nbbbb\n\ncccc").unwrap();
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc"]);
    }

    #[test]
    fn test_overlap_counts_leading_separator_before_trim() {
        // The seeded tail " bar" measures 4; trimming leaves "bar".
        let config = SplitterConfig::with_size_and_overlap(8, 4).separators(&[" ", ""]);
        let chunks = splitter(&config).split_text("foo bar baz qux").unwrap();
        assert_eq!(chunks, vec!["foo bar", "bar baz", "baz qux"]);
    }

    #[test]
    fn test_long_word_falls_back_to_characters() {
        let config = SplitterConfig::with_size(4);
        let chunks = splitter(&config).split_text("ab abcdefghij").unwrap();
        assert_eq!(chunks, vec!["ab", "abc", "defg", "hij"]);
    }

    #[test]
    fn test_piece_equal_to_chunk_size_is_kept() {
        let config = SplitterConfig::with_size(5).keep_separator(KeepSeparator::None);
        let chunks = splitter(&config).split_text("abcde fghij").unwrap();
        assert_eq!(chunks, vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_oversized_piece_emitted_when_no_finer_separator() {
        let config = SplitterConfig::with_size(2)
            .separators(&[""])
            .length_function(LengthKind::Bytes);
        let chunks = splitter(&config).split_text("世界").unwrap();
        assert_eq!(chunks, vec!["世", "界"]);
    }

    #[test_case(&["\n", " "] ; "missing empty separator")]
    #[test_case(&["", " "] ; "empty separator not last")]
    #[test_case(&[" ", "", ""] ; "empty separator twice")]
    fn test_separator_invariant(separators: &[&str]) {
        let config = SplitterConfig::with_size(10).separators(separators);
        let err = RecursiveSplitter::new(&config).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_regex_separators() {
        let config = SplitterConfig::with_size(12)
            .separators(&[r"\n\n", r"(?:\. )", ""])
            .separator_regex(true)
            .keep_separator(KeepSeparator::End);
        let chunks = splitter(&config)
            .split_text("One. Two. Three four five six.")
            .unwrap();
        assert_eq!(chunks, vec!["One. Two.", "Three four f", "ive six."]);
    }

    #[test]
    fn test_deep_input_does_not_overflow() {
        let config = SplitterConfig::with_size(50);
        let text = "word ".repeat(20_000);
        let chunks = splitter(&config).split_text(&text).unwrap();
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
    }

    #[test]
    fn test_start_indices_are_character_offsets() {
        let config = SplitterConfig::with_size(5).add_start_index(true);
        let doc = Document::new("日本語 です ね");
        let chunks = splitter(&config).split_document(&doc).unwrap();
        let starts: Vec<_> = chunks.iter().map(|c| c.start_index()).collect();
        assert_eq!(chunks[0].content, "日本語");
        assert_eq!(starts[0], Some(0));
        assert_eq!(starts.last().copied().flatten(), Some(4));
    }
}
