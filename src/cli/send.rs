//! `palantir-chat send` command implementation.

use crate::config::Config;
use crate::core::Message;
use crate::error::Result;
use crate::storage::{ChatStore, FileBackend};

/// Run the send command.
///
/// Appends a message stamped with the current local time.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the chat is not found.
pub fn run(config: &Config, chat_id: &str, sender: &str, content: &str) -> Result<()> {
    let store = FileBackend::new(&config.storage);
    store.append_message(chat_id, Message::new(sender, content))?;
    println!("Message sent to {chat_id}");
    Ok(())
}
