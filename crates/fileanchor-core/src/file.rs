//! # File Handle
//!
//! A file's path and content, read exactly once at the start of a
//! submission and never mutated afterwards.

use std::path::{Path, PathBuf};

/// Path plus byte content of a file scheduled for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileHandle {
    /// Build a handle from bytes already in memory.
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Read the whole file at `path`.
    ///
    /// Existence and permissions are not probed beforehand; whatever the
    /// read reports is returned.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(path, bytes))
    }

    /// The path the content was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used as the upload's file name. Falls back
    /// to `"file"` for paths without one (e.g. `..`).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string())
    }

    /// The file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content length in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Consume the handle, returning the content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
