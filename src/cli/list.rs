//! `palantir-chat list` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::{ChatStore, FileBackend};

/// Maximum width of the chat id column before truncation.
const ID_PREVIEW_LEN: usize = 36;

/// One row of the room list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    /// Room identifier.
    pub chat_id: String,

    /// Number of participants.
    pub participants: usize,

    /// Number of non-placeholder messages.
    pub messages: usize,
}

/// Run the list command.
///
/// Shows every chat room in file order.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config) -> Result<()> {
    let store = FileBackend::new(&config.storage);
    let chats = summarize(&store)?;

    if chats.is_empty() {
        println!("No chats found.");
        println!("\nChats are stored in: {}", store.path().display());
        return Ok(());
    }

    println!("{:<38} {:>12} {:>9}", "Chat ID", "Participants", "Messages");
    println!("{}", "─".repeat(61));

    for chat in &chats {
        println!(
            "{:<38} {:>12} {:>9}",
            format_id_preview(&chat.chat_id),
            chat.participants,
            chat.messages
        );
    }

    println!("{}", "─".repeat(61));
    println!("Showing {} chat(s)", chats.len());

    Ok(())
}

/// Summarize every chat in the store.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn summarize(store: &dyn ChatStore) -> Result<Vec<ChatSummary>> {
    Ok(store
        .load()?
        .chats
        .iter()
        .map(|chat| ChatSummary {
            chat_id: chat.chat_id.clone(),
            participants: chat.participants.len(),
            messages: chat.real_messages().count(),
        })
        .collect())
}

/// Format a chat id for the table, truncating long ids.
fn format_id_preview(chat_id: &str) -> String {
    if chat_id.is_empty() {
        return "(empty id)".to_string();
    }
    if chat_id.chars().count() > ID_PREVIEW_LEN {
        let head: String = chat_id.chars().take(ID_PREVIEW_LEN - 3).collect();
        format!("{head}...")
    } else {
        chat_id.to_string()
    }
}
