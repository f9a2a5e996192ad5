//! File persistence
//!
//! The editor only needs two things from storage: read a file as a list of
//! lines, and write a block of text back. Both go through the [`Storage`]
//! trait so the editor core never touches the filesystem directly.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Whether the file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Open { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Where buffers are loaded from and saved to
pub trait Storage {
    /// Read a file as lines, without line terminators
    fn load(&self, path: &Path) -> StorageResult<Vec<String>>;

    /// Replace the file's contents with `text`
    fn save(&self, path: &Path, text: &str) -> StorageResult<()>;
}

/// Split file contents into lines, dropping `\n` and a trailing `\r`.
///
/// Bytes that are not valid UTF-8 become U+FFFD, so any file can be opened.
fn split_lines(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&b| b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}

/// Storage on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn load(&self, path: &Path) -> StorageResult<Vec<String>> {
        let mut file = File::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| StorageError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let lines = split_lines(&bytes);
        tracing::info!(path = %path.display(), lines = lines.len(), "loaded file");
        Ok(lines)
    }

    fn save(&self, path: &Path, text: &str) -> StorageResult<()> {
        let mut file = File::create(path).map_err(|source| StorageError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = text.len(), "saved file");
        Ok(())
    }
}
