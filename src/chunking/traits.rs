//! Text splitter trait definition.
//!
//! Defines the interface shared by all splitting strategies. Implementors
//! only provide [`TextSplitter::split_text`]; document handling, metadata
//! propagation and start-index tracking come from the provided methods.

use crate::core::chunk::START_INDEX_KEY;
use crate::core::{Chunk, Document, Metadata};
use crate::error::Result;
use crate::io::unicode::{char_offset, find_char_boundary_forward};

/// Trait for splitting text into chunks.
///
/// Implementations must be `Send + Sync` to support parallel processing,
/// and must be deterministic: the same input and configuration always
/// produce the same chunks.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{RecursiveSplitter, SplitterConfig, TextSplitter};
///
/// let splitter = RecursiveSplitter::new(&SplitterConfig::with_size(11)).unwrap();
/// let chunks = splitter.split_text("one two three four").unwrap();
/// assert_eq!(chunks, vec!["one two", "three four"]);
/// ```
pub trait TextSplitter: Send + Sync {
    /// Splits `text` into chunk contents, in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if an injected length function or tokenizer fails.
    fn split_text(&self, text: &str) -> Result<Vec<String>>;

    /// Returns the name of the splitting strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the splitting strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Returns whether chunks record their character offset in the source.
    fn add_start_index(&self) -> bool {
        false
    }

    /// Splits one document, copying its metadata onto every chunk.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`TextSplitter::split_text`].
    fn split_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        let pieces = self.split_text(&document.content)?;
        let mut locator = StartIndexLocator::new(&document.content);

        Ok(pieces
            .into_iter()
            .map(|piece| {
                let mut metadata = document.metadata.clone();
                if self.add_start_index()
                    && let Some(offset) = locator.locate(&piece)
                {
                    metadata.insert(START_INDEX_KEY.to_string(), offset.into());
                }
                Chunk::with_metadata(piece, metadata)
            })
            .collect())
    }

    /// Splits each document and concatenates the results in input order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while splitting.
    fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for document in documents {
            chunks.extend(self.split_document(document)?);
        }
        Ok(chunks)
    }

    /// Builds documents from raw texts and splits them.
    ///
    /// `metadatas` pairs with `texts` by position; missing entries mean empty
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while splitting.
    fn create_documents(&self, texts: &[&str], metadatas: &[Metadata]) -> Result<Vec<Chunk>> {
        let documents: Vec<Document> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let metadata = metadatas.get(i).cloned().unwrap_or_default();
                Document::with_all_metadata(*text, metadata)
            })
            .collect();
        self.split_documents(&documents)
    }
}

impl<T: TextSplitter + ?Sized> TextSplitter for Box<T> {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        (**self).split_text(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn description(&self) -> &'static str {
        (**self).description()
    }

    fn add_start_index(&self) -> bool {
        (**self).add_start_index()
    }

    fn split_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        (**self).split_document(document)
    }

    fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        (**self).split_documents(documents)
    }
}

/// Finds successive chunks inside their source text.
///
/// Each search starts just past the previous chunk's start, so repeated
/// passages map to successive occurrences.
#[derive(Debug)]
pub(crate) struct StartIndexLocator<'a> {
    source: &'a str,
    previous: Option<usize>,
}

impl<'a> StartIndexLocator<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            source,
            previous: None,
        }
    }

    /// Returns the character offset of `piece`, or `None` if the piece does
    /// not occur verbatim in the source.
    pub(crate) fn locate(&mut self, piece: &str) -> Option<usize> {
        let from = self
            .previous
            .map_or(0, |p| find_char_boundary_forward(self.source, p + 1));
        let byte = self.source[from..]
            .find(piece)
            .map(|i| from + i)
            .or_else(|| self.source.find(piece))?;
        self.previous = Some(byte);
        Some(char_offset(self.source, byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits on whitespace, keeping every word.
    struct WordSplitter;

    impl TextSplitter for WordSplitter {
        fn split_text(&self, text: &str) -> Result<Vec<String>> {
            Ok(text.split_whitespace().map(ToString::to_string).collect())
        }

        fn name(&self) -> &'static str {
            "words"
        }

        fn add_start_index(&self) -> bool {
            true
        }
    }

    /// A splitter that uses all default trait implementations.
    struct MinimalSplitter;

    impl TextSplitter for MinimalSplitter {
        fn split_text(&self, text: &str) -> Result<Vec<String>> {
            Ok(vec![text.to_string()])
        }

        fn name(&self) -> &'static str {
            "minimal"
        }
    }

    #[test]
    fn test_default_description() {
        assert_eq!(MinimalSplitter.description(), "No description available");
        assert!(!MinimalSplitter.add_start_index());
    }

    #[test]
    fn test_split_document_copies_metadata() {
        let doc = Document::new("alpha").with_metadata("source", "a.txt");
        let chunks = MinimalSplitter.split_document(&doc).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata["source"].as_str(), Some("a.txt"));
        assert!(chunks[0].start_index().is_none());
    }

    #[test]
    fn test_start_index_for_repeated_words() {
        let doc = Document::new("ab ab ab");
        let chunks = WordSplitter.split_document(&doc).unwrap();
        let starts: Vec<_> = chunks.iter().map(Chunk::start_index).collect();
        assert_eq!(starts, vec![Some(0), Some(3), Some(6)]);
    }

    #[test]
    fn test_start_index_counts_characters() {
        let doc = Document::new("世界 hello");
        let chunks = WordSplitter.split_document(&doc).unwrap();
        assert_eq!(chunks[1].start_index(), Some(3));
    }

    #[test]
    fn test_create_documents_pairs_metadata() {
        let mut meta = Metadata::new();
        meta.insert("page".to_string(), 7.into());

        let chunks = WordSplitter
            .create_documents(&["one two", "three"], &[meta])
            .unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].metadata["page"].as_i64(), Some(7));
        assert_eq!(chunks[1].metadata["page"].as_i64(), Some(7));
        assert!(!chunks[2].metadata.contains_key("page"));
        assert_eq!(chunks[2].start_index(), Some(0));
    }

    #[test]
    fn test_split_documents_preserves_order() {
        let docs = vec![Document::new("a b"), Document::new("c")];
        let chunks = WordSplitter.split_documents(&docs).unwrap();
        let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_boxed_splitter_forwards() {
        let boxed: Box<dyn TextSplitter> = Box::new(WordSplitter);
        assert_eq!(boxed.name(), "words");
        let chunks = boxed.split_document(&Document::new("x y")).unwrap();
        assert_eq!(chunks[1].start_index(), Some(2));
    }

    #[test]
    fn test_locator_missing_piece() {
        let mut locator = StartIndexLocator::new("abc");
        assert_eq!(locator.locate("zzz"), None);
        assert_eq!(locator.locate("b"), Some(1));
    }
}
