//! Parallel document splitting.
//!
//! Wraps another splitter and splits independent documents in parallel
//! using rayon. Output order always matches input order.

use crate::chunking::traits::TextSplitter;
use crate::core::{Chunk, Document};
use crate::error::Result;
use rayon::prelude::*;
use tracing::debug;

/// Parallel splitting orchestrator.
///
/// Splitting a single text is delegated unchanged; only
/// [`TextSplitter::split_documents`] fans out across threads.
///
/// # Examples
///
/// ```
/// use ragkit::chunking::{ParallelSplitter, RecursiveSplitter, SplitterConfig, TextSplitter};
/// use ragkit::core::Document;
///
/// let inner = RecursiveSplitter::new(&SplitterConfig::with_size(20)).unwrap();
/// let splitter = ParallelSplitter::new(inner);
/// let docs: Vec<Document> = (0..8).map(|i| Document::new(format!("document {i}"))).collect();
/// let chunks = splitter.split_documents(&docs).unwrap();
/// assert_eq!(chunks[3].content, "document 3");
/// ```
#[derive(Debug, Clone)]
pub struct ParallelSplitter<S: TextSplitter> {
    /// The inner splitter used for each document.
    inner: S,
    /// Minimum number of documents before work is fanned out.
    min_parallel_documents: usize,
}

impl<S: TextSplitter> ParallelSplitter<S> {
    /// Creates a new parallel splitter wrapping the given splitter.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            min_parallel_documents: 2,
        }
    }

    /// Sets the minimum number of documents for parallel processing.
    ///
    /// Smaller batches are split sequentially.
    #[must_use]
    pub const fn min_parallel_documents(mut self, count: usize) -> Self {
        self.min_parallel_documents = count;
        self
    }

    /// Returns the wrapped splitter.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TextSplitter> TextSplitter for ParallelSplitter<S> {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        self.inner.split_text(text)
    }

    fn name(&self) -> &'static str {
        "parallel"
    }

    fn description(&self) -> &'static str {
        "Parallel document splitting using rayon for multi-threaded processing"
    }

    fn add_start_index(&self) -> bool {
        self.inner.add_start_index()
    }

    fn split_document(&self, document: &Document) -> Result<Vec<Chunk>> {
        self.inner.split_document(document)
    }

    fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        if documents.len() < self.min_parallel_documents {
            return self.inner.split_documents(documents);
        }

        debug!(documents = documents.len(), "splitting documents in parallel");

        // Indexed collection keeps per-document results in input order
        let results: Vec<Result<Vec<Chunk>>> = documents
            .par_iter()
            .map(|document| self.inner.split_document(document))
            .collect();

        let mut chunks = Vec::new();
        for result in results {
            chunks.extend(result?);
        }
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{CharacterSplitter, MarkdownHeaderSplitter, SplitterConfig};
    use crate::error::Error;

    /// Fails on any document containing "boom".
    struct Exploding;

    impl TextSplitter for Exploding {
        fn split_text(&self, text: &str) -> Result<Vec<String>> {
            if text.contains("boom") {
                return Err(Error::InvariantViolation {
                    message: "boom".to_string(),
                });
            }
            Ok(vec![text.to_string()])
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(format!("doc {i} a\n\ndoc {i} b")).with_metadata("n", i))
            .collect()
    }

    #[test]
    fn test_matches_sequential_output() {
        let config = SplitterConfig::with_size(8);
        let inner = CharacterSplitter::new(&config).unwrap();
        let documents = docs(50);

        let sequential = inner.split_documents(&documents).unwrap();
        let parallel = ParallelSplitter::new(inner).split_documents(&documents).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 100);
    }

    #[test]
    fn test_small_batch_runs_sequentially() {
        let config = SplitterConfig::with_size(8);
        let splitter = ParallelSplitter::new(CharacterSplitter::new(&config).unwrap())
            .min_parallel_documents(100);
        let chunks = splitter.split_documents(&docs(3)).unwrap();
        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks[5].metadata["n"].as_i64(), Some(2));
    }

    #[test]
    fn test_error_propagates() {
        let mut documents = docs(10);
        documents[7] = Document::new("boom");
        let result = ParallelSplitter::new(Exploding).split_documents(&documents);
        assert!(result.unwrap_err().is_invariant_violation());
    }

    #[test]
    fn test_delegates_document_handling() {
        let inner = MarkdownHeaderSplitter::new(&SplitterConfig::default()).unwrap();
        let splitter = ParallelSplitter::new(inner);
        let documents = vec![Document::new("# A\nx"), Document::new("# B\ny")];
        let chunks = splitter.split_documents(&documents).unwrap();
        assert_eq!(chunks[1].metadata["Header 1"].as_str(), Some("B"));
    }

    #[test]
    fn test_name_and_description() {
        let splitter = ParallelSplitter::new(Exploding);
        assert_eq!(splitter.name(), "parallel");
        assert!(splitter.description().contains("Parallel"));
        assert_eq!(splitter.inner().name(), "exploding");
    }
}
