//! `palantir-chat init` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::FileBackend;

/// Run the init command.
///
/// Creates the storage directory and an empty chat file if they are missing.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn run(config: &Config) -> Result<()> {
    let store = FileBackend::open(&config.storage)?;
    println!("Chat file ready: {}", store.path().display());
    Ok(())
}
