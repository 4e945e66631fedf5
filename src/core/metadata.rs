//! Document metadata.
//!
//! Metadata is an ordered map of string keys to scalar values. It is opaque to
//! the splitters: they copy it onto every chunk and only ever add keys
//! (markdown header labels, `start_index`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata attached to a document or chunk.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Scalar metadata value.
///
/// Serialized untagged so metadata round-trips through plain JSON objects
/// such as `{"source": "notes.md", "page": 3}`.
///
/// # Examples
///
/// ```
/// use ragkit::core::MetadataValue;
///
/// let value: MetadataValue = "lecture01.pdf".into();
/// assert_eq!(value.as_str(), Some("lecture01.pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean value.
    Boolean(bool),

    /// Integer value (i64).
    Integer(i64),

    /// Floating point value (f64).
    Float(f64),

    /// String value.
    String(String),

    /// Null/None value.
    Null,
}

impl MetadataValue {
    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<usize> for MetadataValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Integer)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for MetadataValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
