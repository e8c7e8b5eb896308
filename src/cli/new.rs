//! `palantir-chat new` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::{ChatStore, FileBackend};
use uuid::Uuid;

/// Run the new command.
///
/// Adds a chat room, generating an id when none is given.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config, chat_id: Option<&str>, user: Option<&str>) -> Result<()> {
    let store = FileBackend::new(&config.storage);
    let chat_id = create_chat(&store, chat_id, user)?;
    println!("Created chat {chat_id}");
    Ok(())
}

/// Add a chat and optionally record its creator as a participant.
///
/// Returns the id used.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn create_chat(
    store: &dyn ChatStore,
    chat_id: Option<&str>,
    user: Option<&str>,
) -> Result<String> {
    let chat_id = chat_id.map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    store.add_chat(&chat_id)?;
    if let Some(user) = user {
        store.add_participant(&chat_id, user)?;
    }

    Ok(chat_id)
}
