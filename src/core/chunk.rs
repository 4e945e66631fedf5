//! Chunk representation for ragkit.
//!
//! Chunks are segments of document content created by splitters. Each chunk
//! carries the metadata of the document it came from, possibly augmented by
//! the splitter (header labels, start offsets).

use crate::core::document::Document;
use crate::core::metadata::{Metadata, MetadataValue};
use crate::io::find_char_boundary;
use serde::{Deserialize, Serialize};

/// Metadata key written when start indices are requested.
pub const START_INDEX_KEY: &str = "start_index";

/// A segment of a document.
///
/// # Examples
///
/// ```
/// use ragkit::core::Chunk;
///
/// let chunk = Chunk::new("Hello, world!");
/// assert_eq!(chunk.size(), 13);
/// assert!(chunk.metadata.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk content.
    pub content: String,

    /// Inherited and augmented metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Chunk {
    /// Creates a chunk with empty metadata.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Creates a chunk with the given metadata.
    #[must_use]
    pub fn with_metadata(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Returns the size of the chunk in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Checks if the chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the recorded start offset, if the splitter added one.
    #[must_use]
    pub fn start_index(&self) -> Option<usize> {
        self.metadata
            .get(START_INDEX_KEY)
            .and_then(MetadataValue::as_i64)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Returns a preview of the chunk content (at most `max_len` bytes,
    /// cut on a character boundary).
    #[must_use]
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let end = find_char_boundary(&self.content, max_len);
            &self.content[..end]
        }
    }

    /// Converts this chunk into a document, so a structural split can be fed
    /// into a size-bounded splitter.
    #[must_use]
    pub fn into_document(self) -> Document {
        Document::with_all_metadata(self.content, self.metadata)
    }
}

impl From<Chunk> for Document {
    fn from(chunk: Chunk) -> Self {
        chunk.into_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_new() {
        let chunk = Chunk::new("abc");
        assert_eq!(chunk.size(), 3);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.start_index(), None);
    }

    #[test]
    fn test_chunk_start_index() {
        let mut meta = Metadata::new();
        meta.insert(START_INDEX_KEY.to_string(), 12_usize.into());
        let chunk = Chunk::with_metadata("abc", meta);
        assert_eq!(chunk.start_index(), Some(12));
    }

    #[test]
    fn test_chunk_preview_respects_char_boundary() {
        let chunk = Chunk::new("Hello 世界!");
        assert_eq!(chunk.preview(5), "Hello");
        assert_eq!(chunk.preview(7), "Hello ");
        assert_eq!(chunk.preview(100), "Hello 世界!");
    }

    #[test]
    fn test_chunk_into_document_keeps_metadata() {
        let mut meta = Metadata::new();
        meta.insert("Header 1".to_string(), "Title".into());
        let doc: Document = Chunk::with_metadata("body", meta.clone()).into();
        assert_eq!(doc.content, "body");
        assert_eq!(doc.metadata, meta);
    }
}
