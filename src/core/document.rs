//! Chat document types.
//!
//! The whole chat list lives in one [`ChatStoreDocument`] that is read and
//! written in full.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format used for timestamps of messages created here.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Top-level persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStoreDocument {
    /// Reserved; always empty when created.
    #[serde(default)]
    pub backup_data: String,

    /// Chat rooms in insertion order.
    pub chats: Vec<ChatRecord>,
}

impl ChatStoreDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all chats, in document order. Duplicates are kept.
    #[must_use]
    pub fn chat_ids(&self) -> Vec<String> {
        self.chats.iter().map(|c| c.chat_id.clone()).collect()
    }

    /// First chat with the given id.
    #[must_use]
    pub fn find(&self, chat_id: &str) -> Option<&ChatRecord> {
        self.chats.iter().find(|c| c.chat_id == chat_id)
    }

    /// First chat with the given id, mutably.
    pub fn find_mut(&mut self, chat_id: &str) -> Option<&mut ChatRecord> {
        self.chats.iter_mut().find(|c| c.chat_id == chat_id)
    }

    /// Remove every chat with the given id, returning how many went.
    pub fn remove_all(&mut self, chat_id: &str) -> usize {
        let before = self.chats.len();
        self.chats.retain(|c| c.chat_id != chat_id);
        before - self.chats.len()
    }
}

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Room identifier. Not guaranteed unique.
    pub chat_id: String,

    /// Display names of the participants.
    ///
    /// Older files spell the key `partcipants`.
    #[serde(default, alias = "partcipants")]
    pub participants: Vec<String>,

    /// Message history.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChatRecord {
    /// A fresh room: no participants, one placeholder message.
    #[must_use]
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            participants: Vec::new(),
            messages: vec![Message::placeholder()],
        }
    }

    /// Add a participant unless already present. Returns true if added.
    pub fn add_participant(&mut self, name: &str) -> bool {
        if self.participants.iter().any(|p| p == name) {
            return false;
        }
        self.participants.push(name.to_string());
        true
    }

    /// Messages that carry content, skipping placeholders.
    pub fn real_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_placeholder())
    }
}

/// A single chat message.
///
/// Every field is optional so the `{}` placeholder written for new rooms
/// round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Free-form timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    /// Message stamped with the current local time.
    #[must_use]
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::with_timestamp(sender, content, timestamp)
    }

    /// Message with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: Some(sender.into()),
            content: Some(content.into()),
            timestamp: Some(timestamp.into()),
        }
    }

    /// The empty `{}` message.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.sender.is_none() && self.content.is_none() && self.timestamp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_chat_record_shape() {
        let record = ChatRecord::new("room-1");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"chat_id": "room-1", "participants": [], "messages": [{}]})
        );
    }

    #[test]
    fn empty_document_shape() {
        let value = serde_json::to_value(ChatStoreDocument::new()).unwrap();
        assert_eq!(value, json!({"backup_data": "", "chats": []}));
    }

    #[test]
    fn legacy_participants_key_is_accepted() {
        let raw = r#"{"chat_id": "52", "partcipants": ["anna"], "messages": [{}]}"#;
        let record: ChatRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.participants, vec!["anna".to_string()]);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("participants").is_some());
        assert!(value.get("partcipants").is_none());
    }

    #[test]
    fn record_without_lists_defaults_to_empty() {
        let record: ChatRecord = serde_json::from_str(r#"{"chat_id": "52"}"#).unwrap();
        assert!(record.participants.is_empty());
        assert!(record.messages.is_empty());
    }

    #[test]
    fn document_requires_chats() {
        let result = serde_json::from_str::<ChatStoreDocument>(r#"{"backup_data": ""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn document_without_backup_data_loads() {
        let doc: ChatStoreDocument = serde_json::from_str(r#"{"chats": []}"#).unwrap();
        assert_eq!(doc, ChatStoreDocument::new());
    }

    #[test]
    fn record_requires_chat_id() {
        let result = serde_json::from_str::<ChatRecord>(r#"{"participants": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn placeholder_detection() {
        assert!(Message::placeholder().is_placeholder());
        assert!(!Message::with_timestamp("a", "hi", "2024-01-01 10:00:00").is_placeholder());

        let partial = Message {
            content: Some("hi".to_string()),
            ..Message::default()
        };
        assert!(!partial.is_placeholder());
    }

    #[test]
    fn new_message_uses_local_timestamp_format() {
        let msg = Message::new("anna", "ciao");
        let ts = msg.timestamp.unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn real_messages_skips_placeholders() {
        let mut record = ChatRecord::new("room");
        record
            .messages
            .push(Message::with_timestamp("a", "hi", "t"));
        assert_eq!(record.real_messages().count(), 1);
    }

    #[test]
    fn add_participant_is_idempotent() {
        let mut record = ChatRecord::new("room");
        assert!(record.add_participant("anna"));
        assert!(!record.add_participant("anna"));
        assert!(record.add_participant("marco"));
        assert_eq!(record.participants, vec!["anna", "marco"]);
    }

    #[test]
    fn find_returns_first_duplicate() {
        let mut doc = ChatStoreDocument::new();
        let mut first = ChatRecord::new("dup");
        first.add_participant("first");
        doc.chats.push(first);
        doc.chats.push(ChatRecord::new("dup"));

        assert_eq!(doc.find("dup").unwrap().participants, vec!["first"]);
        assert!(doc.find("missing").is_none());
    }

    #[test]
    fn remove_all_drops_every_match() {
        let mut doc = ChatStoreDocument::new();
        for id in ["a", "dup", "b", "dup"] {
            doc.chats.push(ChatRecord::new(id));
        }

        assert_eq!(doc.remove_all("dup"), 2);
        assert_eq!(doc.chat_ids(), vec!["a", "b"]);
        assert_eq!(doc.remove_all("dup"), 0);
    }
}
