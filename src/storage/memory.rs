//! In-memory storage backend for testing.

use crate::core::ChatStoreDocument;
use crate::error::Result;
use crate::storage::traits::ChatStore;
use std::sync::RwLock;

/// In-memory storage backend for testing.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RwLock<Option<ChatStoreDocument>>,
}

impl MemoryBackend {
    /// Create a new, uninitialized in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend already holding `document`.
    #[must_use]
    pub fn with_document(document: ChatStoreDocument) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }

    /// Whether a document has been created yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.document.read().unwrap().is_some()
    }
}

impl ChatStore for MemoryBackend {
    fn ensure_initialized(&self) -> Result<()> {
        let mut document = self.document.write().unwrap();
        document.get_or_insert_with(ChatStoreDocument::new);
        Ok(())
    }

    fn load(&self) -> Result<ChatStoreDocument> {
        let mut document = self.document.write().unwrap();
        Ok(document.get_or_insert_with(ChatStoreDocument::new).clone())
    }

    fn save(&self, document: &ChatStoreDocument) -> Result<()> {
        *self.document.write().unwrap() = Some(document.clone());
        Ok(())
    }
}
