//! Source documents.
//!
//! A document is a unit of text handed to a splitter, typically one file or
//! one page of a file, together with metadata describing where it came from.

use crate::core::metadata::{Metadata, MetadataValue};
use serde::{Deserialize, Serialize};

/// A piece of source text with opaque metadata.
///
/// # Examples
///
/// ```
/// use ragkit::core::Document;
///
/// let doc = Document::new("Hello, world!").with_metadata("source", "greeting.txt");
/// assert_eq!(doc.content, "Hello, world!");
/// assert_eq!(doc.metadata["source"].as_str(), Some("greeting.txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document text.
    #[serde(alias = "page_content")]
    pub content: String,

    /// Document metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Creates a document with empty metadata.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Creates a document with the given metadata.
    #[must_use]
    pub fn with_all_metadata(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Checks if the document has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("text")
            .with_metadata("source", "a.md")
            .with_metadata("page", 2_i64);
        assert_eq!(doc.size(), 4);
        assert!(!doc.is_empty());
        assert_eq!(doc.metadata.len(), 2);
    }

    #[test]
    fn test_document_accepts_page_content_alias() {
        let doc: Document =
            serde_json::from_str(r#"{"page_content":"abc","metadata":{"page":0}}"#).unwrap();
        assert_eq!(doc.content, "abc");
        assert_eq!(doc.metadata["page"].as_i64(), Some(0));
    }

    #[test]
    fn test_document_metadata_defaults_to_empty() {
        let doc: Document = serde_json::from_str(r#"{"content":"abc"}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }
}
