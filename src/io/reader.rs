//! Input text readers.
//!
//! Summaries are built from a file, an inline string or stdin. Large files
//! are memory mapped instead of read through a buffer.

// Memory mapping requires unsafe; the map is read-only and copied out at once
#![allow(unsafe_code)]

use crate::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Files at or above this size (1MB) are memory mapped.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Largest input accepted (64MB). Anything bigger is mostly truncated away
/// by the chunk cap anyway.
pub const MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// An opened input file.
///
/// # Examples
///
/// ```no_run
/// use summarai::io::FileReader;
///
/// let reader = FileReader::open("article.txt").unwrap();
/// let text = reader.read_to_string().unwrap();
/// ```
pub struct FileReader {
    file: File,
    size: u64,
    path: String,
}

impl FileReader {
    /// Opens `path` and checks its size.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the file does not exist and
    /// [`IoError::ReadFailed`] if it cannot be opened or exceeds
    /// [`MAX_INPUT_BYTES`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        if !path_ref.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }

        let read_failed = |e: std::io::Error| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        };
        let file = File::open(path_ref).map_err(read_failed)?;
        let size = file.metadata().map_err(read_failed)?.len();

        if size > MAX_INPUT_BYTES {
            return Err(IoError::ReadFailed {
                path: path_str,
                reason: format!("input too large: {size} bytes (max: {MAX_INPUT_BYTES} bytes)"),
            }
            .into());
        }

        Ok(Self {
            file,
            size,
            path: path_str,
        })
    }

    /// File size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Path as given to [`FileReader::open`].
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or mapping fails, or if the content is
    /// not valid UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        let bytes = if self.size >= MMAP_THRESHOLD {
            tracing::trace!(path = %self.path, size = self.size, "reading via mmap");
            self.read_mapped()?
        } else {
            self.read_buffered()?
        };
        decode_utf8(bytes, &self.path)
    }

    fn read_mapped(&self) -> Result<Vec<u8>> {
        // SAFETY: read-only mapping, copied before the map is dropped
        let mmap = unsafe {
            Mmap::map(&self.file).map_err(|e| IoError::MmapFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?
        };
        Ok(mmap.to_vec())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_buffered(&self) -> Result<Vec<u8>> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }
}

fn decode_utf8(bytes: Vec<u8>, path: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        IoError::ReadFailed {
            path: path.to_string(),
            reason: format!("invalid UTF-8: {e}"),
        }
        .into()
    })
}

/// Reads a file to a string.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    FileReader::open(path)?.read_to_string()
}

/// Reads all of `reader` as UTF-8, up to [`MAX_INPUT_BYTES`].
///
/// # Errors
///
/// Returns an error if reading fails, the input is too large, or it is not
/// valid UTF-8.
pub fn read_stream<R: Read>(reader: R, name: &str) -> Result<String> {
    let mut buffer = Vec::new();
    reader
        .take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buffer)
        .map_err(|e| IoError::ReadFailed {
            path: name.to_string(),
            reason: e.to_string(),
        })?;

    if buffer.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::ReadFailed {
            path: name.to_string(),
            reason: format!("input too large (max: {MAX_INPUT_BYTES} bytes)"),
        }
        .into());
    }
    decode_utf8(buffer, name)
}

/// Reads standard input to a string.
///
/// # Errors
///
/// See [`read_stream`].
pub fn read_stdin() -> Result<String> {
    read_stream(std::io::stdin().lock(), "<stdin>")
}
