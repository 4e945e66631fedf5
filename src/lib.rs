//! # ragkit
//!
//! Text chunking and conversation memory for retrieval-augmented LLM
//! workflows.
//!
//! Two independent components:
//!
//! - **Chunking**: split documents into overlapping chunks sized for a
//!   context window (character, recursive, token, and markdown strategies)
//! - **Memory**: keep a bounded view of a conversation (full buffer, last-k
//!   window, token budget, or token budget with a running summary)
//!
//! Token counting and summarization are injected collaborators, so both
//! components run offline with the deterministic implementations shipped in
//! [`tokens`] and [`memory::TranscriptSummarizer`].

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod memory;
pub mod tokens;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Chunk, Document, Metadata, MetadataValue};

// Re-export chunking types
pub use chunking::{
    CharacterSplitter, MarkdownHeaderSplitter, ParallelSplitter, RecursiveSplitter,
    SplitterConfig, TextSplitter, TokenSplitter, available_strategies, create_splitter,
};

// Re-export memory types
pub use memory::{
    ConversationBuffer, ConversationMemory, MemoryConfig, Summarizer, SummaryBuffer, TokenBuffer,
    Turn, WindowBuffer, available_policies, create_memory,
};

// Re-export token collaborators
pub use tokens::{TokenCounter, Tokenizer};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
