//! `palantir-chat export`, `import` and `backups` command implementations.

use crate::backup::{BackupFormat, BackupManager};
use crate::config::Config;
use crate::core::ChatRecord;
use crate::error::Result;
use crate::storage::{ChatStore, FileBackend};
use chrono::{DateTime, Local};
use std::path::Path;

/// Run the export command.
///
/// # Errors
///
/// Returns an error if the format is unknown, or reading the chat file or
/// writing the backup fails.
pub fn export(config: &Config, format: &str, name: Option<&str>) -> Result<()> {
    let format: BackupFormat = format.parse()?;
    let store = FileBackend::new(&config.storage);
    let manager = BackupManager::new(&config.backup)?.with_protected_file(store.path());

    let document = store.load()?;
    let path = manager.export(&document.chats, format, name)?;

    println!(
        "Exported {} chat(s) to {}",
        document.chats.len(),
        path.display()
    );
    Ok(())
}

/// Run the import command.
///
/// # Errors
///
/// Returns an error if the backup cannot be read or the chat file cannot be
/// updated.
pub fn import(config: &Config, path: &Path) -> Result<()> {
    let store = FileBackend::new(&config.storage);
    let manager = BackupManager::new(&config.backup)?;

    let chats = manager.import_json(path)?;
    let count = append_chats(&store, chats)?;

    println!("Imported {count} chat(s) from {}", path.display());
    Ok(())
}

/// Run the backups command.
///
/// # Errors
///
/// Returns an error if the backup directory cannot be read.
pub fn list(config: &Config) -> Result<()> {
    let manager = BackupManager::new(&config.backup)?;
    let backups = manager.list_backups()?;

    if backups.is_empty() {
        println!("No backups found in {}", manager.dir().display());
        return Ok(());
    }

    println!("{:<40} {:>10} Modified", "File", "Size");
    println!("{}", "─".repeat(70));

    for entry in &backups {
        println!(
            "{:<40} {:>10} {}",
            entry.file_name,
            format_size(entry.size),
            format_local_time(entry.modified)
        );
    }

    Ok(())
}

/// Append imported chats after the existing ones. Duplicates are kept.
///
/// # Errors
///
/// Returns an error if loading or saving fails.
pub fn append_chats(store: &dyn ChatStore, chats: Vec<ChatRecord>) -> Result<usize> {
    let count = chats.len();
    if count == 0 {
        return Ok(0);
    }

    let mut document = store.load()?;
    document.chats.extend(chats);
    store.save(&document)?;

    tracing::info!(count, "imported chats");
    Ok(count)
}

/// Format a byte count for display.
#[allow(clippy::cast_precision_loss)] // One decimal place is all we show
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn format_local_time(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}
