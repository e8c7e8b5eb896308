//! Storage trait definitions.

use crate::core::{ChatRecord, ChatStoreDocument, Message};
use crate::error::{Error, Result};

/// Storage backend for the chat document.
///
/// Backends only provide whole-document access. Every mutation is a
/// load-modify-save cycle with no locking, so two concurrent writers can
/// lose each other's updates.
pub trait ChatStore: Send + Sync {
    /// Make sure the backing document exists, creating an empty one if not.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn ensure_initialized(&self) -> Result<()>;

    /// Load the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails or the stored data
    /// is not a valid document.
    fn load(&self) -> Result<ChatStoreDocument>;

    /// Replace the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn save(&self, document: &ChatStoreDocument) -> Result<()>;

    /// Append a new chat with no participants and one placeholder message.
    ///
    /// The id is not checked for emptiness or uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    fn add_chat(&self, chat_id: &str) -> Result<()> {
        let mut document = self.load()?;
        document.chats.push(ChatRecord::new(chat_id));
        self.save(&document)?;
        tracing::info!(chat_id, "added chat");
        Ok(())
    }

    /// Remove every chat with this id. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    fn delete_chat(&self, chat_id: &str) -> Result<usize> {
        let mut document = self.load()?;
        let removed = document.remove_all(chat_id);
        if removed > 0 {
            self.save(&document)?;
            tracing::info!(chat_id, removed, "deleted chat");
        }
        Ok(removed)
    }

    /// Append a message to the first chat with this id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChatNotFound`] if no chat has this id, or an error
    /// if loading or saving fails.
    fn append_message(&self, chat_id: &str, message: Message) -> Result<()> {
        let mut document = self.load()?;
        let chat = document
            .find_mut(chat_id)
            .ok_or_else(|| Error::ChatNotFound(chat_id.to_string()))?;
        chat.messages.push(message);
        self.save(&document)?;
        tracing::info!(chat_id, "appended message");
        Ok(())
    }

    /// Add a participant to the first chat with this id.
    ///
    /// Returns false, without writing, if the name is already listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChatNotFound`] if no chat has this id, or an error
    /// if loading or saving fails.
    fn add_participant(&self, chat_id: &str, name: &str) -> Result<bool> {
        let mut document = self.load()?;
        let chat = document
            .find_mut(chat_id)
            .ok_or_else(|| Error::ChatNotFound(chat_id.to_string()))?;
        if !chat.add_participant(name) {
            return Ok(false);
        }
        self.save(&document)?;
        tracing::info!(chat_id, participant = name, "added participant");
        Ok(true)
    }

    /// Ids of all chats in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    fn chat_ids(&self) -> Result<Vec<String>> {
        Ok(self.load()?.chat_ids())
    }

    /// First chat with this id.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    fn find_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>> {
        Ok(self.load()?.find(chat_id).cloned())
    }
}
