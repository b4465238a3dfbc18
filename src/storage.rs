//! Durable, string-valued key-value storage.
//!
//! Every write replaces the complete value stored under a key. Reads and writes are synchronous;
//! a write has completed before the next read begins.

use crate::{fs, Result};
use anyhow::bail;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The key under which the serialized `FamilyProfile` is stored.
pub const FAMILY_KEY: &str = "family_profile";

/// The key under which the serialized list of `Transaction` is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// A key-value store holding string values.
pub trait Storage: Send {
    /// Returns the value for `key`, or `None` if nothing is stored under it.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a key that is not present succeeds.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Stores each key as a `<key>.json` file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        fs::read_optional(self.path(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write_all(self.path(key)?, value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        fs::remove_file(self.path(key)?)
    }
}

/// Keeps values in memory. Writes can be switched off to simulate storage that refuses them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: HashMap<String, String>,
    refuse_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with `(key, value)` pairs.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            refuse_writes: false,
        }
    }

    /// When `refuse` is true, every `set` and `remove` fails.
    pub fn set_refuse_writes(&mut self, refuse: bool) {
        self.refuse_writes = refuse;
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.refuse_writes {
            bail!("Storage refused to write '{key}': quota exceeded or storage unavailable");
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.data.remove(key);
        Ok(())
    }
}
