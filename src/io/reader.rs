//! File reading utilities with memory mapping support.
//!
//! Provides efficient file reading for both small and large files, plus the
//! loaders that turn files into [`Document`]s for the splitters.

#![allow(unsafe_code)]

use crate::core::Document;
use crate::error::{IoError, Result};
use memmap2::Mmap;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Files at or above this size (1MB) are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Largest input accepted (1GB).
const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Metadata key recording where a loaded document came from.
pub const SOURCE_KEY: &str = "source";

/// An opened input file, read as UTF-8 text.
///
/// Inputs under 1MB are read with a single `read`; larger inputs are
/// memory-mapped and validated in place, so only the final `String` is
/// allocated.
///
/// # Examples
///
/// ```no_run
/// use ragkit::io::FileReader;
///
/// let text = FileReader::open("corpus.txt")?.read_to_string()?;
/// # Ok::<(), ragkit::Error>(())
/// ```
pub struct FileReader {
    file: File,
    len: u64,
    display: String,
}

impl FileReader {
    /// Opens `path`, rejecting missing files and files over 1GB.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::ReadFailed`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy().into_owned();

        if !path.is_file() {
            return Err(IoError::FileNotFound { path: display }.into());
        }

        let failed = |e: std::io::Error| IoError::ReadFailed {
            path: display.clone(),
            reason: e.to_string(),
        };
        let file = File::open(path).map_err(failed)?;
        let len = file.metadata().map_err(failed)?.len();

        if len > MAX_FILE_SIZE {
            return Err(IoError::ReadFailed {
                path: display,
                reason: format!("file too large: {len} bytes (max: {MAX_FILE_SIZE} bytes)"),
            }
            .into());
        }

        Ok(Self { file, len, display })
    }

    /// Reads the whole file as text.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or mapping fails, or the content is not
    /// valid UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        if self.len < MMAP_THRESHOLD {
            let mut file = &self.file;
            let mut text = String::new();
            std::io::Read::read_to_string(&mut file, &mut text).map_err(|e| {
                IoError::ReadFailed {
                    path: self.display.clone(),
                    reason: e.to_string(),
                }
            })?;
            return Ok(text);
        }

        // SAFETY: the map is read-only and dropped before returning.
        let mmap = unsafe { Mmap::map(&self.file) }.map_err(|e| IoError::MmapFailed {
            path: self.display.clone(),
            reason: e.to_string(),
        })?;
        std::str::from_utf8(&mmap).map(str::to_owned).map_err(|e| {
            IoError::ReadFailed {
                path: self.display.clone(),
                reason: format!("invalid UTF-8: {e}"),
            }
            .into()
        })
    }
}

/// Reads a file to string, automatically choosing the best method.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    FileReader::open(path)?.read_to_string()
}

/// Reads and deserializes a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse as `T`.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path_ref = path.as_ref();
    let content = read_file(path_ref)?;
    serde_json::from_str(&content).map_err(|e| {
        IoError::ParseFailed {
            path: path_ref.to_string_lossy().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Loads a text file as a single document.
///
/// The document's metadata records the file path under `source`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path_ref = path.as_ref();
    let content = read_file(path_ref)?;
    Ok(Document::new(content).with_metadata(SOURCE_KEY, path_ref.to_string_lossy().as_ref()))
}

/// Loads a JSON array of documents (`[{"content": ..., "metadata": {...}}]`).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_documents_json<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    read_json(path)
}

/// Writes chunks to individual files in a directory.
///
/// # Arguments
///
/// * `out_dir` - Directory to write chunks to.
/// * `chunks` - Iterator of (index, content) pairs.
/// * `prefix` - Filename prefix (e.g., "chunk").
///
/// # Returns
///
/// Vector of paths to the written files.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
pub fn write_chunks<'a, P, I>(out_dir: P, chunks: I, prefix: &str) -> Result<Vec<String>>
where
    P: AsRef<Path>,
    I: Iterator<Item = (usize, &'a str)>,
{
    let out_path = out_dir.as_ref();

    if !out_path.exists() {
        std::fs::create_dir_all(out_path).map_err(|e| IoError::DirectoryFailed {
            path: out_path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
    }

    let mut paths = Vec::new();

    for (index, content) in chunks {
        let file_path = out_path.join(format!("{prefix}_{index:04}.txt"));
        let file_str = file_path.to_string_lossy().to_string();

        std::fs::write(&file_path, content).map_err(|e| IoError::WriteFailed {
            path: file_str.clone(),
            reason: e.to_string(),
        })?;

        paths.push(file_str);
    }

    Ok(paths)
}
