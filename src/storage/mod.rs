//! Static-file store backing the `/files/<name>` routes.
//!
//! Names are a single path segment resolved against one root directory.
//! Concurrent writes to the same name are not serialized; the last writer wins.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

/// Errors returned by [`StaticFiles`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no static-file directory configured")]
    NotConfigured,

    #[error("invalid file name: {name:?}")]
    InvalidName { name: String },

    #[error("failed to read {name:?}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {name:?}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Reads and writes whole files under an optional root directory.
///
/// With no root every operation fails with [`StorageError::NotConfigured`].
#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    root: Option<PathBuf>,
}

impl StaticFiles {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Creates a store with no backing directory.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Returns the root directory, if one is configured.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Reads the whole file `name`.
    pub async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(name)?;
        fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|source| StorageError::Read {
                name: name.to_owned(),
                source,
            })
    }

    /// Writes `contents` to `name`, creating or truncating it.
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        fs::write(&path, contents)
            .await
            .map_err(|source| StorageError::Write {
                name: name.to_owned(),
                source,
            })
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let root = self.root.as_ref().ok_or(StorageError::NotConfigured)?;
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StorageError::InvalidName {
                name: name.to_owned(),
            });
        }
        Ok(root.join(name))
    }
}
