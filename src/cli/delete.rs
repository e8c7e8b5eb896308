//! `palantir-chat delete` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::{ChatStore, FileBackend};

/// Run the delete command.
///
/// Removes every chat with the given id.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config, chat_id: &str) -> Result<()> {
    let store = FileBackend::new(&config.storage);
    let removed = store.delete_chat(chat_id)?;

    if removed == 0 {
        println!("No chat named {chat_id}.");
    } else {
        println!("Deleted {removed} chat(s) named {chat_id}.");
    }

    Ok(())
}
