//! Markdown heading-based splitting.
//!
//! Walks the document line by line, tracking the stack of open headings.
//! Content between headings becomes chunks whose metadata maps each open
//! heading's label to its text. Fenced code blocks are opaque: lines inside
//! them are content even if they look like headings.

use crate::chunking::config::{HeaderMarker, SplitterConfig};
use crate::chunking::traits::TextSplitter;
use crate::core::{Chunk, Document, Metadata};
use crate::error::{ConfigError, Result};

/// Separator between blocks merged into one chunk (a markdown hard break).
const BLOCK_JOIN: &str = "  \n";

/// An open heading.
#[derive(Debug, Clone)]
struct OpenHeader {
    level: usize,
    label: String,
}

/// A run of content lines sharing the same heading metadata.
#[derive(Debug, Clone)]
struct Block {
    lines: Vec<String>,
    metadata: Metadata,
}

/// Tracks whether the scanner is inside a fenced code block.
#[derive(Debug, Default)]
struct Fence {
    open: Option<&'static str>,
}

impl Fence {
    /// Updates state for `line` and returns `true` if the line belongs to a
    /// code block (including its opening fence).
    fn observe(&mut self, line: &str) -> bool {
        match self.open {
            None => {
                if line.starts_with("```") && line.matches("```").count() == 1 {
                    self.open = Some("```");
                } else if line.starts_with("~~~") {
                    self.open = Some("~~~");
                }
            }
            Some(marker) => {
                if line.starts_with(marker) {
                    self.open = None;
                }
            }
        }
        self.open.is_some()
    }
}

/// Splitter that partitions markdown by headings.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{MarkdownHeaderSplitter, SplitterConfig};
///
/// let splitter = MarkdownHeaderSplitter::new(&SplitterConfig::default()).unwrap();
/// let chunks = splitter.split_text_with_metadata("# Intro\nHello\n## Usage\nRun it").unwrap();
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1].content, "Run it");
/// assert_eq!(chunks[1].metadata["Header 2"].as_str(), Some("Usage"));
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownHeaderSplitter {
    /// Markers sorted longest first so `##` wins over `#`.
    headers: Vec<HeaderMarker>,
    strip_headers: bool,
    return_each_line: bool,
}

impl MarkdownHeaderSplitter {
    /// Creates a splitter from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHeaders`] if no heading markers are configured.
    pub fn new(config: &SplitterConfig) -> Result<Self> {
        if config.headers_to_split_on.is_empty() {
            return Err(ConfigError::NoHeaders.into());
        }
        let mut headers = config.headers_to_split_on.clone();
        headers.sort_by_key(|h| std::cmp::Reverse(h.marker.len()));

        Ok(Self {
            headers,
            strip_headers: config.strip_headers,
            return_each_line: config.return_each_line,
        })
    }

    /// Splits markdown into chunks carrying heading metadata only.
    ///
    /// # Errors
    ///
    /// This splitter has no fallible collaborators; the `Result` matches the
    /// other splitters.
    pub fn split_text_with_metadata(&self, text: &str) -> Result<Vec<Chunk>> {
        let blocks = self.scan(text);
        let chunks = if self.return_each_line {
            blocks
                .into_iter()
                .flat_map(|block| {
                    let metadata = block.metadata;
                    block
                        .lines
                        .into_iter()
                        .map(move |line| Chunk::with_metadata(line, metadata.clone()))
                })
                .collect()
        } else {
            self.aggregate(blocks)
        };
        Ok(chunks)
    }

    /// Matches `line` against the heading markers.
    fn match_header<'a>(&'a self, line: &'a str) -> Option<(&'a HeaderMarker, &'a str)> {
        self.headers.iter().find_map(|header| {
            let rest = line.strip_prefix(header.marker.as_str())?;
            (rest.is_empty() || rest.starts_with(' ')).then_some((header, rest.trim()))
        })
    }

    /// Groups lines into blocks under their heading metadata.
    fn scan(&self, text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut stack: Vec<OpenHeader> = Vec::new();
        let mut open = Metadata::new();
        let mut current = Metadata::new();
        let mut lines: Vec<String> = Vec::new();
        let mut fence = Fence::default();

        for raw in text.split('\n') {
            let line = raw.trim();

            if fence.observe(line) {
                lines.push(line.to_string());
                continue;
            }

            if let Some((header, title)) = self.match_header(line) {
                let level = header.level();
                while stack.last().is_some_and(|top| top.level >= level) {
                    if let Some(closed) = stack.pop() {
                        open.remove(&closed.label);
                    }
                }
                stack.push(OpenHeader {
                    level,
                    label: header.label.clone(),
                });
                open.insert(header.label.clone(), title.into());

                if !lines.is_empty() {
                    blocks.push(Block {
                        lines: std::mem::take(&mut lines),
                        metadata: current.clone(),
                    });
                }
                if !self.strip_headers {
                    lines.push(line.to_string());
                }
            } else if !line.is_empty() {
                lines.push(line.to_string());
            } else if !lines.is_empty() {
                blocks.push(Block {
                    lines: std::mem::take(&mut lines),
                    metadata: current.clone(),
                });
            }

            current.clone_from(&open);
        }

        if !lines.is_empty() {
            blocks.push(Block {
                lines,
                metadata: current,
            });
        }
        blocks
    }

    /// Merges consecutive blocks with identical metadata.
    ///
    /// With headings kept in content, a block holding only a heading line is
    /// folded into the deeper section that follows it.
    fn aggregate(&self, blocks: Vec<Block>) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        for block in blocks {
            let content = block.lines.join("\n");
            if let Some(last) = chunks.last_mut() {
                if last.metadata == block.metadata {
                    last.content.push_str(BLOCK_JOIN);
                    last.content.push_str(&content);
                    continue;
                }
                let ends_with_heading = last
                    .content
                    .rsplit('\n')
                    .next()
                    .is_some_and(|line| line.starts_with('#'));
                if !self.strip_headers
                    && last.metadata.len() < block.metadata.len()
                    && ends_with_heading
                {
                    last.content.push_str(BLOCK_JOIN);
                    last.content.push_str(&content);
                    last.metadata = block.metadata;
                    continue;
                }
            }
            chunks.push(Chunk::with_metadata(content, block.metadata));
        }
        chunks
    }
}

impl TextSplitter for MarkdownHeaderSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .split_text_with_metadata(text)?
            .into_iter()
            .map(|chunk| chunk.content)
            .collect())
    }

    fn name(&self) -> &'static str {
        "markdown"
    }

    fn description(&self) -> &'static str {
        "Splits markdown by headings, recording the heading path as metadata"
    }

    /// Heading metadata is layered over the document's own metadata.
    fn split_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        Ok(self
            .split_text_with_metadata(&document.content)?
            .into_iter()
            .map(|chunk| {
                let mut metadata = document.metadata.clone();
                metadata.extend(chunk.metadata);
                Chunk::with_metadata(chunk.content, metadata)
            })
            .collect())
    }
}
