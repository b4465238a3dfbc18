//! Export and import of backup files.

use crate::args::{ExportArgs, ImportArgs};
use crate::backup::{BackupDocument, PRE_IMPORT};
use crate::commands::{confirm, open, plural, unlock, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info};

/// Writes the family and all transactions to `Backup_<family>_<date>.json` in `args.dir()`.
pub async fn export(config: Config, pin: Option<&str>, args: ExportArgs) -> Result<Out<PathBuf>> {
    let household = unlock(&config, pin)?;
    let document = BackupDocument::capture(&household, Utc::now())
        .context("No family is registered")
        .pub_result(ErrorType::Auth)?;
    let path = document.export(args.dir()).await.pub_result(ErrorType::Storage)?;
    Ok(Out::new(
        format!(
            "Exported {} to '{}'",
            plural(document.transactions.len(), "transaction", "transactions"),
            path.display()
        ),
        path,
    ))
}

/// Replaces the family and all transactions on this device with the contents of a backup file.
///
/// When a family is registered, its PIN is required and its data is first saved to a snapshot
/// in the backups directory. Without a registered family, a backup can be restored without a
/// PIN. A file that is refused leaves the local data as it was.
pub async fn import(config: Config, pin: Option<&str>, args: ImportArgs) -> Result<Out<PathBuf>> {
    let mut household = open(&config)?;
    if household.profile().is_some() {
        household = unlock(&config, pin)?;
    }
    confirm(
        args.yes(),
        "Importing will overwrite the data on this device with the data in the backup.",
    )
    .pub_result(ErrorType::Input)?;

    let document = BackupDocument::read(args.file())
        .await
        .map_err(anyhow::Error::new)
        .pub_result(ErrorType::Import)?;
    debug!(
        "Backup of the {} family from {} is valid",
        document.family.family_name(),
        document.export_date
    );

    if let Some(current) = BackupDocument::capture(&household, Utc::now()) {
        let snapshot = config
            .backup()
            .save_json(PRE_IMPORT, &current)
            .await
            .context("Unable to save a snapshot of the current data")
            .pub_result(ErrorType::Storage)?;
        info!("Saved the current data to '{}'", snapshot.display());
    }

    let family_name = document.family.family_name().to_string();
    let count = document.transactions.len();
    household
        .replace_all(document.family, document.transactions)
        .pub_result(ErrorType::Storage)?;

    Ok(Out::new(
        format!(
            "Data restored successfully: the {family_name} family with {}",
            plural(count, "transaction", "transactions")
        ),
        args.file().to_path_buf(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::AddArgs;
    use crate::backup::ImportError;
    use crate::commands::add;
    use crate::error::error_type;
    use crate::model::{Amount, Category, TransactionType};
    use crate::test::TestEnv;
    use std::str::FromStr;

    async fn add_expense(env: &TestEnv, amount: &str) {
        let args = AddArgs::new(
            TransactionType::Expense,
            Amount::from_str(amount).unwrap(),
            Category::Utilities,
            "Luis",
        )
        .with_description("power bill");
        add(env.config(), Some(TestEnv::PIN), args).await.unwrap();
    }

    #[tokio::test]
    async fn test_export_then_import_elsewhere() {
        let source = TestEnv::new().await;
        add_expense(&source, "80").await;
        add_expense(&source, "20").await;
        let out = export(
            source.config(),
            Some(TestEnv::PIN),
            ExportArgs::new(source.scratch()),
        )
        .await
        .unwrap();
        let path = out.structure().unwrap().clone();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Backup_Garcia_"));

        let target = TestEnv::empty().await;
        import(target.config(), None, ImportArgs::new(&path, true))
            .await
            .unwrap();
        let restored = target.household();
        assert_eq!(restored.profile(), source.household().profile());
        assert_eq!(restored.transactions(), source.household().transactions());
        // Nothing to snapshot on an empty device.
        assert_eq!(std::fs::read_dir(target.config().backups()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_import_snapshots_current_data() {
        let env = TestEnv::new().await;
        add_expense(&env, "5").await;
        let before = env.household().transactions().to_vec();

        let file = env.scratch().join("other.json");
        std::fs::write(
            &file,
            r#"{"family": {"familyName": "Lopez", "members": ["Marta"], "pin": "4321"},
                "transactions": [], "exportDate": "2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        import(env.config(), Some(TestEnv::PIN), ImportArgs::new(&file, true))
            .await
            .unwrap();

        let household = env.household();
        assert_eq!(household.profile().unwrap().family_name(), "Lopez");
        assert!(household.authenticate("4321").is_ok());
        assert!(household.transactions().is_empty());

        let snapshots: Vec<_> = std::fs::read_dir(env.config().backups())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(snapshots.len(), 1);
        let saved = BackupDocument::read(&snapshots[0]).await.unwrap();
        assert_eq!(saved.family.family_name(), "Garcia");
        assert_eq!(saved.transactions, before);
    }

    #[tokio::test]
    async fn test_import_rejections_leave_data() {
        let env = TestEnv::new().await;
        add_expense(&env, "5").await;
        let before = env.household().transactions().to_vec();

        let not_backup = env.scratch().join("not_backup.json");
        std::fs::write(&not_backup, r#"{"hello": "world"}"#).unwrap();
        let e = import(env.config(), Some(TestEnv::PIN), ImportArgs::new(&not_backup, true))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Import));
        assert_eq!(
            e.root_cause().downcast_ref::<ImportError>(),
            Some(&ImportError::NotABackup)
        );

        let garbage = env.scratch().join("garbage.json");
        std::fs::write(&garbage, "not json at all").unwrap();
        let e = import(env.config(), Some(TestEnv::PIN), ImportArgs::new(&garbage, true))
            .await
            .unwrap_err();
        assert_eq!(
            e.root_cause().downcast_ref::<ImportError>(),
            Some(&ImportError::Unreadable)
        );

        let household = env.household();
        assert_eq!(household.profile().unwrap().family_name(), "Garcia");
        assert_eq!(household.transactions(), before.as_slice());
        assert_eq!(std::fs::read_dir(env.config().backups()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_import_requires_pin_and_confirmation() {
        let env = TestEnv::new().await;
        let file = env.scratch().join("x.json");
        let e = import(env.config(), Some("0000"), ImportArgs::new(&file, true))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Auth));
        assert!(import(env.config(), Some(TestEnv::PIN), ImportArgs::new(&file, false))
            .await
            .is_err());
    }
}
