//! Backup files: the user-facing export/import document and the automatic safety snapshots that
//! are written to `.backups` before an import overwrites local data.

use crate::household::Household;
use crate::model::{FamilyProfile, Transaction};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Prefix for the snapshot taken before an import replaces local data.
pub const PRE_IMPORT: &str = "pre-import";

/// The complete data of one family as written by `export` and accepted by `import`.
///
/// ```json
/// {
///   "family": { "familyName": "Garcia", "members": ["Ana", "Luis"], "pin": "1234" },
///   "transactions": [],
///   "exportDate": "2025-05-02T08:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub family: FamilyProfile,
    pub transactions: Vec<Transaction>,
    pub export_date: DateTime<Utc>,
}

impl BackupDocument {
    /// Captures the household's current data. Returns `None` if no family is registered.
    pub fn capture(household: &Household, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            family: household.profile()?.clone(),
            transactions: household.transactions().to_vec(),
            export_date: now,
        })
    }

    /// The file name used when exporting, e.g. `Backup_Garcia_2025-05-02.json`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!(
            "Backup_{}_{}.json",
            sanitize_file_name(self.family.family_name()),
            date.format("%Y-%m-%d")
        )
    }

    /// Writes the document into `dir` and returns the path of the new file.
    pub async fn export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name(Local::now().date_naive()));
        utils::serialize(&path, self)
            .await
            .with_context(|| format!("Unable to write the backup file '{}'", path.display()))?;
        Ok(path)
    }

    /// Reads and checks a backup file.
    pub async fn read(path: &Path) -> std::result::Result<Self, ImportError> {
        let content = utils::read(path).await.map_err(|e| {
            error!("Error importing data: {e:#}");
            ImportError::Unreadable
        })?;
        Self::parse(&content)
    }

    /// Parses `content`, which must be a JSON object with a `family` object and a `transactions`
    /// array that both match the data model.
    pub fn parse(content: &str) -> std::result::Result<Self, ImportError> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            error!("Error importing data: {e}");
            ImportError::Unreadable
        })?;
        let has_family = value.get("family").is_some_and(|f| f.is_object());
        let has_transactions = value.get("transactions").is_some_and(|t| t.is_array());
        if !has_family || !has_transactions {
            debug!(
                "Rejecting backup: family present {has_family}, \
                 transactions present {has_transactions}"
            );
            return Err(ImportError::NotABackup);
        }

        let family = serde_json::from_value(value["family"].clone()).map_err(|e| {
            debug!("Rejecting backup, family does not match: {e}");
            ImportError::NotABackup
        })?;
        let transactions = serde_json::from_value(value["transactions"].clone()).map_err(|e| {
            debug!("Rejecting backup, transactions do not match: {e}");
            ImportError::NotABackup
        })?;
        // Older exports may lack the date; it is informational only.
        let export_date = value
            .get("exportDate")
            .and_then(|d| serde_json::from_value(d.clone()).ok())
            .unwrap_or_else(Utc::now);

        Ok(Self {
            family,
            transactions,
            export_date,
        })
    }
}

/// Why a file was refused by `import`. Local data is untouched in both cases.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ImportError {
    /// The file is JSON but does not have the shape of a backup.
    NotABackup,
    /// The file could not be read or is not JSON.
    Unreadable,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::NotABackup => f.write_str("The selected file is not a valid backup."),
            ImportError::Unreadable => f.write_str(
                "An error occurred while reading the file. Make sure it is a valid .json file.",
            ),
        }
    }
}

impl std::error::Error for ImportError {}

/// Replaces characters that are not safe in file names with `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Manages snapshot file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Saves `document` as a pretty-printed JSON snapshot.
    ///
    /// The filename format is `{prefix}.YYYY-MM-DD-NNN.json` where NNN is a sequence number.
    /// Old snapshots are rotated, keeping only `backup_copies` files.
    ///
    /// Returns the path to the created file.
    pub async fn save_json(&self, prefix: &str, document: &BackupDocument) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let path = self.backups_dir.join(format!("{prefix}.{date}-{seq:03}.json"));

        utils::serialize(&path, document).await?;
        self.rotate(prefix).await?;
        Ok(path)
    }

    /// Returns one more than the highest sequence number used today for `prefix`.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names().await? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Deletes the oldest snapshots with `prefix` until only `backup_copies` remain.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files: Vec<String> = self
            .file_names()
            .await?
            .into_iter()
            .filter(|name| is_backup_file(name, prefix))
            .collect();

        // The date and sequence number make file names sort chronologically.
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            debug!("Removing old snapshot {name}");
            utils::remove(&self.backups_dir.join(name)).await?;
        }
        Ok(())
    }

    async fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from `{prefix}.{date}-{NNN}.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(".json")
}
