//! Backup export and import.
//!
//! Backups are standalone files next to (by default) the chat file: a JSON
//! export that can be imported again, or a plain-text transcript.

use crate::config::BackupConfig;
use crate::core::ChatRecord;
use crate::error::{Error, Result};
use crate::storage::file::to_json_indented;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Version tag written into JSON exports.
pub const EXPORT_VERSION: &str = "1.0";

/// Width of the separator rules in text exports.
const RULE_WIDTH: usize = 50;

/// Backup file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupFormat {
    /// Re-importable JSON.
    Json,
    /// Human-readable transcript.
    Txt,
}

impl BackupFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }
}

impl std::str::FromStr for BackupFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            other => Err(Error::InvalidArgument(format!(
                "unknown backup format: {other}"
            ))),
        }
    }
}

/// A file found in the backup directory.
#[derive(Debug, Clone)]
pub struct BackupEntry {
    /// File name.
    pub file_name: String,

    /// Full path.
    pub path: PathBuf,

    /// Size in bytes.
    pub size: u64,

    /// Last modification time.
    pub modified: DateTime<Local>,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    export_date: String,
    version: &'a str,
    chats: &'a [ChatRecord],
}

#[derive(Deserialize)]
struct ImportDocument {
    chats: Vec<ChatRecord>,
}

/// Writes and reads backup files in one directory.
#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
    protected: Option<PathBuf>,
}

impl BackupManager {
    /// Create a manager, creating the backup directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(config: &BackupConfig) -> Result<Self> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self {
            dir: config.dir.clone(),
            protected: None,
        })
    }

    /// Refuse to export over `path`, typically the live chat file.
    #[must_use]
    pub fn with_protected_file(mut self, path: &Path) -> Self {
        self.protected = Some(path.to_path_buf());
        self
    }

    /// Backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export chats in `format`, returning the written path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `file_name` is not a plain
    /// name inside the backup directory or names the protected file, or an
    /// error if the file cannot be written.
    pub fn export(
        &self,
        chats: &[ChatRecord],
        format: BackupFormat,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        match format {
            BackupFormat::Json => self.export_json(chats, file_name),
            BackupFormat::Txt => self.export_txt(chats, file_name),
        }
    }

    /// Export chats as JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a rejected `file_name`, or an
    /// error if the file cannot be written.
    pub fn export_json(&self, chats: &[ChatRecord], file_name: Option<&str>) -> Result<PathBuf> {
        let path = self.target_path(file_name, BackupFormat::Json)?;
        let export = ExportDocument {
            export_date: Local::now().to_rfc3339(),
            version: EXPORT_VERSION,
            chats,
        };
        fs::write(&path, to_json_indented(&export, b"  ")?)?;
        tracing::info!(path = %path.display(), chats = chats.len(), "exported JSON backup");
        Ok(path)
    }

    /// Export chats as a plain-text transcript.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a rejected `file_name`, or an
    /// error if the file cannot be written.
    pub fn export_txt(&self, chats: &[ChatRecord], file_name: Option<&str>) -> Result<PathBuf> {
        let path = self.target_path(file_name, BackupFormat::Txt)?;
        fs::write(&path, render_transcript(chats, Local::now()))?;
        tracing::info!(path = %path.display(), chats = chats.len(), "exported text backup");
        Ok(path)
    }

    /// Read the chats from a JSON export.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or
    /// [`Error::Corruption`] if it is not a valid export.
    pub fn import_json(&self, path: &Path) -> Result<Vec<ChatRecord>> {
        let contents = fs::read_to_string(path)?;
        let import: ImportDocument =
            serde_json::from_str(&contents).map_err(|source| Error::Corruption {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), chats = import.chats.len(), "read JSON backup");
        Ok(import.chats)
    }

    /// List regular files in the backup directory, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let mut backups = Vec::new();

        if !self.dir.exists() {
            return Ok(backups);
        }

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            // Follows symlinks; dangling links are skipped
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            backups.push(BackupEntry {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size: metadata.len(),
                modified: metadata.modified()?.into(),
            });
        }

        backups.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(backups)
    }

    fn target_path(&self, file_name: Option<&str>, format: BackupFormat) -> Result<PathBuf> {
        let Some(name) = file_name else {
            return Ok(self.dir.join(default_backup_name(Local::now(), format)));
        };

        let mut components = Path::new(name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || name.contains(['/', '\\']) {
            return Err(Error::InvalidArgument(format!(
                "backup name must be a plain file name: {name}"
            )));
        }

        let path = self.dir.join(name);
        if self.is_protected(&path) {
            return Err(Error::InvalidArgument(format!(
                "backup name would overwrite the chat file: {name}"
            )));
        }
        Ok(path)
    }

    fn is_protected(&self, path: &Path) -> bool {
        let Some(protected) = &self.protected else {
            return false;
        };
        if path.file_name() != protected.file_name() {
            return false;
        }
        let dir = protected
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        match (fs::canonicalize(&self.dir), fs::canonicalize(dir)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.dir == dir,
        }
    }
}

/// Timestamped default name, e.g. `chat_backup_20240501_093000.json`.
#[must_use]
pub fn default_backup_name(now: DateTime<Local>, format: BackupFormat) -> String {
    format!(
        "chat_backup_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render chats as a readable transcript. Placeholder messages are skipped.
#[must_use]
pub fn render_transcript(chats: &[ChatRecord], now: DateTime<Local>) -> String {
    let mut out = format!(
        "=== BACKUP CHAT - {} ===\n\n",
        now.format("%Y-%m-%d %H:%M:%S")
    );

    for chat in chats {
        out.push_str(&format!("Chat: {}\n", chat.chat_id));
        out.push_str(&format!("Participants: {}\n", chat.participants.join(", ")));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');

        for message in chat.real_messages() {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                message.timestamp.as_deref().unwrap_or_default(),
                message.sender.as_deref().unwrap_or_default(),
                message.content.as_deref().unwrap_or_default(),
            ));
        }

        out.push('\n');
        out.push_str(&"=".repeat(RULE_WIDTH));
        out.push_str("\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Message;
    use chrono::TimeZone;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupManager::new(&BackupConfig {
            dir: temp_dir.path().join("exports"),
        })
        .unwrap();
        (manager, temp_dir)
    }

    fn sample_chats() -> Vec<ChatRecord> {
        let mut chat = ChatRecord::new("ops");
        chat.add_participant("anna");
        chat.add_participant("marco");
        chat.messages
            .push(Message::with_timestamp("anna", "ciao a tutti", "2024-05-01 09:30:00"));
        vec![chat, ChatRecord::new("empty")]
    }

    #[test]
    fn creates_backup_directory() {
        let (manager, temp_dir) = create_test_manager();
        assert!(temp_dir.path().join("exports").is_dir());
        assert_eq!(manager.dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn parse_format() {
        assert_eq!("json".parse::<BackupFormat>().unwrap(), BackupFormat::Json);
        assert_eq!("TXT".parse::<BackupFormat>().unwrap(), BackupFormat::Txt);
        assert_eq!("text".parse::<BackupFormat>().unwrap(), BackupFormat::Txt);
        assert!(matches!(
            "pickle".parse::<BackupFormat>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn default_name_uses_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(
            default_backup_name(now, BackupFormat::Json),
            "chat_backup_20240501_093000.json"
        );
        assert_eq!(
            default_backup_name(now, BackupFormat::Txt),
            "chat_backup_20240501_093000.txt"
        );
    }

    #[test]
    fn json_export_then_import() {
        let (manager, _temp) = create_test_manager();
        let chats = sample_chats();

        let path = manager.export_json(&chats, None).unwrap();
        assert!(path.extension().is_some_and(|e| e == "json"));

        let imported = manager.import_json(&path).unwrap();
        assert_eq!(imported, chats);
    }

    #[test]
    fn json_export_has_metadata() {
        let (manager, _temp) = create_test_manager();
        let path = manager
            .export_json(&sample_chats(), Some("fixed.json"))
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "fixed.json");

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(
            DateTime::parse_from_rfc3339(value["export_date"].as_str().unwrap()).is_ok()
        );
        assert!(contents.contains("\n  \"version\""));
        assert!(contents.contains("ciao a tutti"));
    }

    #[test]
    fn import_rejects_invalid_file() {
        let (manager, _temp) = create_test_manager();
        let path = manager.dir().join("broken.json");
        fs::write(&path, r#"{"export_date": "x"}"#).unwrap();

        assert!(manager.import_json(&path).unwrap_err().is_corruption());
    }

    #[test]
    fn import_missing_file_is_storage_error() {
        let (manager, _temp) = create_test_manager();
        let result = manager.import_json(&manager.dir().join("absent.json"));
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[test]
    fn transcript_layout() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let text = render_transcript(&sample_chats(), now);

        let rule = "-".repeat(50);
        let double = "=".repeat(50);
        let expected = format!(
            "=== BACKUP CHAT - 2024-05-01 09:30:00 ===\n\n\
             Chat: ops\n\
             Participants: anna, marco\n\
             {rule}\n\
             [2024-05-01 09:30:00] anna: ciao a tutti\n\
             \n{double}\n\n\
             Chat: empty\n\
             Participants: \n\
             {rule}\n\
             \n{double}\n\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn txt_export_writes_file() {
        let (manager, _temp) = create_test_manager();
        let path = manager
            .export(&sample_chats(), BackupFormat::Txt, None)
            .unwrap();
        assert!(path.extension().is_some_and(|e| e == "txt"));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("=== BACKUP CHAT - "));
    }

    #[test]
    fn list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();
        let old = manager.dir().join("old.json");
        let new = manager.dir().join("new.txt");
        fs::write(&old, "{}").unwrap();
        fs::write(&new, "hello").unwrap();

        let earlier = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(earlier)
            .unwrap();

        // Directories are not backups
        fs::create_dir(manager.dir().join("nested")).unwrap();

        let backups = manager.list_backups().unwrap();
        let names: Vec<_> = backups.iter().map(|b| b.file_name.as_str()).collect();
        assert_eq!(names, vec!["new.txt", "old.json"]);
        assert_eq!(backups[0].size, 5);
    }

    #[test]
    fn export_rejects_paths_in_name() {
        let (manager, temp_dir) = create_test_manager();
        for name in ["../escape.json", "nested/x.json", "/tmp/abs.json", "..", ".", ""] {
            let result = manager.export_json(&sample_chats(), Some(name));
            assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "accepted {name:?}"
            );
        }
        assert!(!temp_dir.path().join("escape.json").exists());
    }

    #[test]
    fn export_refuses_to_overwrite_chat_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("backups");
        let chat_file = root.join("chat.json");
        let manager = BackupManager::new(&BackupConfig { dir: root.clone() })
            .unwrap()
            .with_protected_file(&chat_file);
        fs::write(&chat_file, r#"{"backup_data": "", "chats": []}"#).unwrap();

        for format in [BackupFormat::Json, BackupFormat::Txt] {
            let result = manager.export(&sample_chats(), format, Some("chat.json"));
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
        assert_eq!(
            fs::read_to_string(&chat_file).unwrap(),
            r#"{"backup_data": "", "chats": []}"#
        );

        // Other names in the same directory are fine
        assert!(manager.export_json(&sample_chats(), Some("other.json")).is_ok());
    }

    #[test]
    fn protected_file_matches_across_path_spellings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("backups");
        let manager = BackupManager::new(&BackupConfig { dir: root.clone() })
            .unwrap()
            .with_protected_file(&root.join(".").join("chat.json"));

        let result = manager.export_json(&sample_chats(), Some("chat.json"));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[cfg(unix)]
    #[test]
    fn list_backups_follows_symlinks() {
        let (manager, temp_dir) = create_test_manager();
        let outside = temp_dir.path().join("elsewhere.json");
        fs::write(&outside, "{}").unwrap();
        std::os::unix::fs::symlink(&outside, manager.dir().join("linked.json")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing.json"),
            manager.dir().join("dangling.json"),
        )
        .unwrap();

        let backups = manager.list_backups().unwrap();
        let names: Vec<_> = backups.iter().map(|b| b.file_name.as_str()).collect();
        assert_eq!(names, vec!["linked.json"]);
        assert_eq!(backups[0].size, 2);
    }

    #[test]
    fn list_backups_missing_directory() {
        let (manager, temp_dir) = create_test_manager();
        fs::remove_dir(temp_dir.path().join("exports")).unwrap();
        assert!(manager.list_backups().unwrap().is_empty());
    }
}
