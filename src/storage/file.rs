//! File-based storage backend.

use crate::config::StorageConfig;
use crate::core::ChatStoreDocument;
use crate::error::{Error, Result};
use crate::storage::traits::ChatStore;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// JSON file backend holding the whole chat list in one file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for the configured chat file.
    ///
    /// Nothing touches the disk until the first operation.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            path: config.file_path(),
        }
    }

    /// Create a backend and make sure the chat file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let backend = Self::new(config);
        backend.ensure_initialized()?;
        Ok(backend)
    }

    /// Path of the chat file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChatStore for FileBackend {
    fn ensure_initialized(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "creating empty chat file");
            self.save(&ChatStoreDocument::new())?;
        }
        Ok(())
    }

    fn load(&self) -> Result<ChatStoreDocument> {
        if !self.path.exists() {
            self.ensure_initialized()?;
        }
        tracing::debug!(path = %self.path.display(), "loading chat file");
        let contents = fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|source| Error::Corruption {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, document: &ChatStoreDocument) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        // Unique per writer so concurrent saves never share a temp file
        let temp = self.path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        // Write to temp file first
        let contents = to_json_indented(document, b"    ")?;
        fs::write(&temp, &contents)?;

        // Rename over the old file so a crash mid-write keeps it intact
        fs::rename(&temp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            chats = document.chats.len(),
            "saved chat file"
        );
        Ok(())
    }
}

/// Serialize `value` as pretty JSON with a custom indent.
///
/// Non-ASCII text is written as-is.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub(crate) fn to_json_indented<T: Serialize>(value: &T, indent: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    value.serialize(&mut ser)?;
    Ok(buf)
}
