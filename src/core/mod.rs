//! Core domain models for ragkit.
//!
//! This module contains the value types shared by the splitters and their
//! callers: documents, chunks, and the scalar metadata attached to both.
//! These are pure domain models with no I/O dependencies.

pub mod chunk;
pub mod document;
pub mod metadata;

pub use chunk::Chunk;
pub use document::Document;
pub use metadata::{Metadata, MetadataValue};
