//! `palantir-chat show` command implementation.

use crate::config::Config;
use crate::core::ChatRecord;
use crate::error::{Error, Result};
use crate::storage::{ChatStore, FileBackend};

/// Run the show command.
///
/// Prints participants and messages of one chat.
///
/// # Errors
///
/// Returns an error if the storage backend fails or the chat is not found.
pub fn run(config: &Config, chat_id: &str) -> Result<()> {
    let store = FileBackend::new(&config.storage);

    let chat = store
        .find_chat(chat_id)?
        .ok_or_else(|| Error::ChatNotFound(chat_id.to_string()))?;

    print!("{}", format_chat(&chat));
    Ok(())
}

/// Render a chat for the terminal.
#[must_use]
pub fn format_chat(chat: &ChatRecord) -> String {
    let participants = if chat.participants.is_empty() {
        "(none)".to_string()
    } else {
        chat.participants.join(", ")
    };

    let mut out = format!("Chat: {}\nParticipants: {participants}\n\n", chat.chat_id);

    let mut any = false;
    for message in chat.real_messages() {
        any = true;
        out.push_str(&format!(
            "[{}] {}: {}\n",
            message.timestamp.as_deref().unwrap_or("?"),
            message.sender.as_deref().unwrap_or("?"),
            message.content.as_deref().unwrap_or_default(),
        ));
    }
    if !any {
        out.push_str("(no messages)\n");
    }

    out
}
