//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::household::Household;
use crate::model::{FamilyProfile, Pin};
use crate::storage::FileStorage;
use crate::Config;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a budget home directory with a Config and, optionally, a
/// registered family. Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub const PIN: &'static str = "1234";

    /// Creates a budget home with the Garcia family (Ana and Luis) registered under `PIN`.
    pub async fn new() -> Self {
        let env = Self::empty().await;
        let profile =
            FamilyProfile::new("Garcia", ["Ana", "Luis"], Pin::from_str(Self::PIN).unwrap())
                .unwrap();
        env.household().register(profile).unwrap();
        env
    }

    /// Creates a budget home with no family registered.
    pub async fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("budget")).await.unwrap();
        std::fs::create_dir(temp_dir.path().join("scratch")).unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Loads the household as it is currently stored.
    pub fn household(&self) -> Household {
        Household::load(Box::new(FileStorage::open(self.config.store()).unwrap()))
    }

    /// A directory outside the budget home for files such as exported backups.
    pub fn scratch(&self) -> PathBuf {
        self.temp_dir.path().join("scratch")
    }
}
