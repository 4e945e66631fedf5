//! Error types for ragkit operations.
//!
//! This module provides the error hierarchy using `thiserror` for chunking,
//! conversation memory, file I/O and CLI commands. Construction-time problems
//! surface as [`ConfigError`] or [`Error::InvariantViolation`]; failures of
//! injected collaborators (token counters, tokenizers, summarizers) surface as
//! [`CollaboratorError`] with the original error kept as the source.

use thiserror::Error;

/// Result type alias for ragkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by injected collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid construction parameters.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure propagated from an injected collaborator.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// A structural invariant of the configuration does not hold.
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// Description of the violated invariant.
        message: String,
    },

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

impl Error {
    /// Returns `true` for [`Error::Config`].
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` for [`Error::Collaborator`].
    #[must_use]
    pub const fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }

    /// Returns `true` for [`Error::InvariantViolation`].
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

/// Invalid splitter or memory configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunk size of zero.
    #[error("chunk_size must be > 0")]
    ZeroChunkSize,

    /// Overlap is not smaller than the chunk size.
    #[error("chunk overlap {overlap} must be less than chunk size {size}")]
    OverlapTooLarge {
        /// Overlap size.
        overlap: usize,
        /// Chunk size.
        size: usize,
    },

    /// Separator pattern could not be compiled.
    #[error("invalid separator {pattern:?}: {reason}")]
    InvalidSeparator {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Markdown splitter built without any header markers.
    #[error("headers_to_split_on must not be empty")]
    NoHeaders,

    /// Window memory built with `k == 0`.
    #[error("window size k must be > 0")]
    ZeroWindow,

    /// Token-limited memory built with a zero budget.
    #[error("max_token_limit must be > 0")]
    ZeroTokenLimit,

    /// Unknown splitting strategy name.
    #[error("unknown splitting strategy: {name}")]
    UnknownStrategy {
        /// Name of the unknown strategy.
        name: String,
    },

    /// Unknown memory policy name.
    #[error("unknown memory policy: {name}")]
    UnknownPolicy {
        /// Name of the unknown policy.
        name: String,
    },

    /// A value that does not fit its option.
    #[error("invalid value: {reason}")]
    InvalidValue {
        /// Reason the value is invalid.
        reason: String,
    },
}

/// Failure raised by an injected collaborator, passed through unchanged.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The token counter failed.
    #[error("token counter failed: {0}")]
    TokenCounter(#[source] BoxError),

    /// The tokenizer failed.
    #[error("tokenizer failed: {0}")]
    Tokenizer(#[source] BoxError),

    /// The summarizer failed.
    #[error("summarizer failed: {0}")]
    Summarizer(#[source] BoxError),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// File content could not be parsed.
    #[error("failed to parse {path}: {reason}")]
    ParseFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}
