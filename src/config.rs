//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and contains the backup
//! settings and the settings of the AI advisor.

use crate::backup::Backup;
use crate::storage::FileStorage;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const STORE: &str = "store";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_LANGUAGE: &str = "English";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It provides
/// paths to the items that are expected in a certain location within the budget home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    store: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its subdirectories and an initial `config.json` holding the
    /// default settings. An existing `config.json` is kept as it is.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;
        let store = root.join(STORE);
        utils::make_dir(&store).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            backups,
            store,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups and store directories exist
    /// - return the loaded configuration object
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The budget home is missing. Run 'budget init' first.")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            store: root.join(STORE),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        if !config.store.is_dir() {
            bail!(
                "The store directory is missing '{}'",
                config.store.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn advisor(&self) -> &AdvisorSettings {
        &self.config_file.advisor
    }

    /// Opens the durable storage that holds the family profile and the transactions.
    pub fn storage(&self) -> Result<FileStorage> {
        FileStorage::open(&self.store)
    }

    /// Creates a new `Backup` instance for managing snapshot files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "backup_copies": 5,
///   "advisor": {
///     "endpoint": "https://generativelanguage.googleapis.com",
///     "model": "gemini-2.5-flash",
///     "language": "English",
///     "timeout_secs": 60
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    config_version: u8,

    /// Number of pre-import snapshots to keep
    backup_copies: u32,

    #[serde(default)]
    advisor: AdvisorSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            advisor: AdvisorSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        config.advisor.endpoint_url()?;
        anyhow::ensure!(
            config.advisor.timeout_secs > 0,
            "Invalid advisor timeout_secs in config file: must be greater than zero"
        );

        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Where and how the AI advisor is reached.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct AdvisorSettings {
    /// Base URL of the Gemini-compatible API
    pub endpoint: String,
    pub model: String,
    /// The language the report is written in
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AdvisorSettings {
    /// Parses `endpoint`, which must be an absolute http or https URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid advisor endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Invalid advisor endpoint '{url}': expected an http or https URL");
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("budget_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.store().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.backup_copies(), 5);
        assert_eq!(config.advisor(), &AdvisorSettings::default());
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_store() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        tokio::fs::remove_dir(config.store()).await.unwrap();
        let e = Config::load(dir.path()).await.unwrap_err();
        assert!(e.to_string().contains("store directory is missing"));
    }

    #[tokio::test]
    async fn test_config_create_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_JSON);
        let json = r#"{"app_name": "budget", "config_version": 1, "backup_copies": 2}"#;
        utils::write(&path, json).await.unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        assert_eq!(config.backup_copies(), 2);
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "budget");
        assert_eq!(config.backup_copies, 5);
        assert_eq!(
            config.advisor.endpoint_url().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/"
        );
        assert_eq!(config.advisor.model, "gemini-2.5-flash");
        assert_eq!(config.advisor.timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let mut original = ConfigFile::default();
        original.backup_copies = 7;
        original.advisor.language = "Spanish".to_string();
        original.save(&config_path).await.unwrap();

        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_with_partial_advisor() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "budget",
            "config_version": 1,
            "backup_copies": 3,
            "advisor": { "endpoint": "http://localhost:8080", "language": "French" }
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.backup_copies, 3);
        assert_eq!(config.advisor.endpoint, "http://localhost:8080");
        assert_eq!(config.advisor.language, "French");
        assert_eq!(config.advisor.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{"app_name": "wrong_app", "config_version": 1, "backup_copies": 5}"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{"app_name": "budget", "config_version": 1, "backup_copies": 5,
            "advisor": {"endpoint": "not a url"}}"#;
        utils::write(&config_path, json).await.unwrap();
        assert!(ConfigFile::load(&config_path).await.is_err());
    }

    #[test]
    fn test_endpoint_url_requires_http() {
        let settings = AdvisorSettings {
            endpoint: "ftp://example.com".to_string(),
            ..AdvisorSettings::default()
        };
        assert!(settings.endpoint_url().is_err());
    }
}
