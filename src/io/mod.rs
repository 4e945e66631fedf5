//! I/O utilities for ragkit.
//!
//! Provides file reading with memory mapping support for large files,
//! document loaders, and Unicode utilities.

pub mod reader;
pub mod unicode;

pub use reader::{
    FileReader, SOURCE_KEY, load_document, load_documents_json, read_file, read_json,
    write_chunks,
};
pub use unicode::{char_count, char_offset, find_char_boundary, grapheme_count};
