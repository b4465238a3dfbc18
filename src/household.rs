//! The family's data: its profile and its transactions, mirrored to durable storage.
//!
//! `Household` is the explicit context object every command works through. Each mutation writes
//! the complete new value to storage first and only then updates the in-memory copy, so a failed
//! write leaves the household exactly as it was.

use crate::model::{FamilyProfile, NewTransaction, Transaction};
use crate::storage::{Storage, FAMILY_KEY, TRANSACTIONS_KEY};
use crate::utils::generate_transaction_id;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

pub struct Household {
    storage: Box<dyn Storage>,
    profile: Option<FamilyProfile>,
    /// Newest first.
    transactions: Vec<Transaction>,
}

impl std::fmt::Debug for Household {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Household")
            .field("profile", &self.profile)
            .field("transactions", &self.transactions.len())
            .finish()
    }
}

impl Household {
    /// Loads the profile and transactions from `storage`.
    ///
    /// Stored values that cannot be read or parsed are logged and replaced by an empty default.
    /// Transactions without an ID are given one.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let profile: Option<FamilyProfile> = load_value(storage.as_ref(), FAMILY_KEY);
        let mut transactions: Vec<Transaction> =
            load_value(storage.as_ref(), TRANSACTIONS_KEY).unwrap_or_default();

        let mut repaired = 0;
        for t in transactions.iter_mut().filter(|t| t.id.trim().is_empty()) {
            t.id = generate_transaction_id();
            repaired += 1;
        }

        let mut household = Self {
            storage,
            profile,
            transactions,
        };
        if repaired > 0 {
            warn!("Assigned new IDs to {repaired} stored transactions that had none");
            let repaired_list = household.transactions.clone();
            if let Err(e) = household.save_transactions(repaired_list) {
                warn!("Unable to save repaired transactions: {e:#}");
            }
        }
        debug!("Loaded {household:?}");
        household
    }

    pub fn profile(&self) -> Option<&FamilyProfile> {
        self.profile.as_ref()
    }

    /// Returns the profile, or an error if no family has been registered.
    pub fn require_profile(&self) -> Result<&FamilyProfile> {
        self.profile
            .as_ref()
            .context("No family is registered. Run 'budget init' first.")
    }

    /// All transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Checks `pin` against the registered family's PIN.
    pub fn authenticate(&self, pin: &str) -> Result<&FamilyProfile> {
        let profile = self.require_profile()?;
        if !profile.pin().matches(pin) {
            bail!("Incorrect PIN, please try again.");
        }
        Ok(profile)
    }

    /// Registers the family for this installation.
    ///
    /// # Errors
    /// - A family is already registered.
    /// - The profile could not be saved. Nothing is registered in that case.
    pub fn register(&mut self, profile: FamilyProfile) -> Result<()> {
        if let Some(existing) = &self.profile {
            bail!(
                "The family '{}' is already registered on this device",
                existing.family_name()
            );
        }
        self.save_profile(profile)
            .context("There was an error saving the data on this device")
    }

    pub fn add_member(&mut self, name: &str) -> Result<&FamilyProfile> {
        let next = self.require_profile()?.with_member(name)?;
        self.save_profile(next)?;
        self.require_profile()
    }

    pub fn remove_member(&mut self, name: &str) -> Result<&FamilyProfile> {
        let next = self.require_profile()?.without_member(name)?;
        self.save_profile(next)?;
        self.require_profile()
    }

    /// Validates `new` against the current members and records it as the newest transaction.
    pub fn add_transaction<Tz: TimeZone>(
        &mut self,
        new: NewTransaction,
        now: &DateTime<Tz>,
    ) -> Result<&Transaction> {
        let members = self.require_profile()?.members();
        let transaction = new.into_transaction(members, now)?;
        let mut next = Vec::with_capacity(self.transactions.len() + 1);
        next.push(transaction);
        next.extend(self.transactions.iter().cloned());
        self.save_transactions(next)?;
        self.transactions
            .first()
            .context("The transaction list is unexpectedly empty")
    }

    /// Removes the transaction with `id` and returns it.
    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction> {
        let Some(ix) = self.transactions.iter().position(|t| t.id == id) else {
            bail!("Transaction not found: '{id}'");
        };
        let mut next = self.transactions.clone();
        let removed = next.remove(ix);
        self.save_transactions(next)?;
        Ok(removed)
    }

    /// Overwrites the profile and every transaction, as when restoring a backup.
    pub fn replace_all(
        &mut self,
        profile: FamilyProfile,
        mut transactions: Vec<Transaction>,
    ) -> Result<()> {
        for t in transactions.iter_mut().filter(|t| t.id.trim().is_empty()) {
            t.id = generate_transaction_id();
        }
        let previous_profile = self.profile.clone();
        self.save_profile(profile)?;
        if let Err(e) = self.save_transactions(transactions) {
            // Put the previous profile back so the two keys stay consistent.
            let restored = match previous_profile {
                Some(p) => self.save_profile(p),
                None => self.storage.remove(FAMILY_KEY).map(|_| self.profile = None),
            };
            if let Err(restore_error) = restored {
                error!("Unable to restore the previous family profile: {restore_error:#}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Deletes the profile and every transaction.
    pub fn reset(&mut self) -> Result<()> {
        self.storage
            .remove(TRANSACTIONS_KEY)
            .context("Unable to clear the stored transactions")?;
        self.transactions.clear();
        self.storage
            .remove(FAMILY_KEY)
            .context("Unable to clear the stored family profile")?;
        self.profile = None;
        Ok(())
    }

    fn save_profile(&mut self, profile: FamilyProfile) -> Result<()> {
        store_value(self.storage.as_mut(), FAMILY_KEY, &profile)?;
        self.profile = Some(profile);
        Ok(())
    }

    fn save_transactions(&mut self, transactions: Vec<Transaction>) -> Result<()> {
        store_value(self.storage.as_mut(), TRANSACTIONS_KEY, &transactions)?;
        self.transactions = transactions;
        Ok(())
    }
}

fn load_value<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            error!("Unable to read '{key}' from storage: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Error parsing stored '{key}', falling back to an empty value: {e}");
            None
        }
    }
}

fn store_value<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<()> {
    let json =
        serde_json::to_string(value).with_context(|| format!("Unable to serialize '{key}'"))?;
    storage
        .set(key, &json)
        .with_context(|| format!("Unable to save '{key}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category, Pin, TransactionType};
    use crate::storage::MemoryStorage;
    use chrono::{FixedOffset, NaiveDate};
    use std::str::FromStr;

    fn profile() -> FamilyProfile {
        FamilyProfile::new("Garcia", vec!["Ana", "Luis"], Pin::from_str("1234").unwrap()).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 5, 2, 8, 0, 0)
            .unwrap()
    }

    fn expense(amount: &str) -> NewTransaction {
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            amount: Amount::from_str(amount).unwrap(),
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            description: Some("market".to_string()),
            created_by: "Ana".to_string(),
            company: None,
        }
    }

    fn registered() -> Household {
        let mut h = Household::load(Box::new(MemoryStorage::new()));
        h.register(profile()).unwrap();
        h
    }

    /// A household whose storage refuses writes after registration.
    fn read_only() -> Household {
        let json = serde_json::to_string(&profile()).unwrap();
        let mut storage = MemoryStorage::with_values([(FAMILY_KEY, json)]);
        storage.set_refuse_writes(true);
        Household::load(Box::new(storage))
    }

    #[test]
    fn test_register_and_authenticate() {
        let h = registered();
        assert_eq!(h.profile().unwrap().family_name(), "Garcia");
        assert!(h.authenticate("1234").is_ok());
        let e = h.authenticate("0000").unwrap_err();
        assert_eq!(e.to_string(), "Incorrect PIN, please try again.");
    }

    #[test]
    fn test_register_twice_is_refused() {
        let mut h = registered();
        assert!(h.register(profile()).is_err());
    }

    #[test]
    fn test_register_failure_does_not_apply() {
        let mut storage = MemoryStorage::new();
        storage.set_refuse_writes(true);
        let mut h = Household::load(Box::new(storage));
        assert!(h.register(profile()).is_err());
        assert!(h.profile().is_none());
        assert!(h.authenticate("1234").is_err());
    }

    #[test]
    fn test_add_transaction_prepends() {
        let mut h = registered();
        let first = h.add_transaction(expense("10"), &now()).unwrap().id().to_string();
        let second = h.add_transaction(expense("20"), &now()).unwrap().id().to_string();
        let ids: Vec<&str> = h.transactions().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[test]
    fn test_add_transaction_requires_member() {
        let mut h = registered();
        let mut n = expense("10");
        n.created_by = "Pedro".to_string();
        assert!(h.add_transaction(n, &now()).is_err());
        assert!(h.transactions().is_empty());
    }

    #[test]
    fn test_add_transaction_write_failure_leaves_list_unchanged() {
        let mut h = read_only();
        assert!(h.add_transaction(expense("10"), &now()).is_err());
        assert!(h.transactions().is_empty());
    }

    #[test]
    fn test_delete_transaction() {
        let mut h = registered();
        let id = h.add_transaction(expense("10"), &now()).unwrap().id().to_string();
        h.add_transaction(expense("20"), &now()).unwrap();
        let removed = h.delete_transaction(&id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(h.transactions().len(), 1);
        assert!(h.delete_transaction(&id).is_err());
    }

    #[test]
    fn test_members() {
        let mut h = registered();
        h.add_member("Sofia").unwrap();
        assert!(h.profile().unwrap().is_member("Sofia"));
        h.remove_member("Ana").unwrap();
        assert!(!h.profile().unwrap().is_member("Ana"));
        assert!(h.remove_member("Ana").is_err());
    }

    #[test]
    fn test_member_write_failure_keeps_profile() {
        let mut h = read_only();
        assert!(h.add_member("Sofia").is_err());
        assert!(!h.profile().unwrap().is_member("Sofia"));
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_defaults() {
        let storage = MemoryStorage::with_values([
            (FAMILY_KEY, "{not json"),
            (TRANSACTIONS_KEY, "[{\"broken\": true}]"),
        ]);
        let h = Household::load(Box::new(storage));
        assert!(h.profile().is_none());
        assert!(h.transactions().is_empty());
    }

    #[test]
    fn test_out_of_range_stored_amount_is_corrupt() {
        let stored = r#"[{"id":"x","date":"2025-05-01T10:00:00Z","amount":5e28,"type":"expense",
            "category":"Food","description":"x","createdBy":"Ana"}]"#;
        let storage = MemoryStorage::with_values([(TRANSACTIONS_KEY, stored)]);
        let h = Household::load(Box::new(storage));
        assert!(h.transactions().is_empty());
    }

    #[test]
    fn test_missing_ids_are_repaired() {
        let stored = r#"[{"date":"2025-05-01T10:00:00Z","amount":5,"type":"expense",
            "category":"Food","description":"x","createdBy":"Ana"}]"#;
        let storage = MemoryStorage::with_values([(TRANSACTIONS_KEY, stored)]);
        let h = Household::load(Box::new(storage));
        assert_eq!(h.transactions().len(), 1);
        assert!(!h.transactions()[0].id().is_empty());
    }

    #[test]
    fn test_replace_all_and_reset() {
        let mut h = registered();
        h.add_transaction(expense("10"), &now()).unwrap();
        let other = FamilyProfile::new("Lopez", vec!["Marta"], Pin::from_str("9999").unwrap())
            .unwrap();
        h.replace_all(other.clone(), Vec::new()).unwrap();
        assert_eq!(h.profile(), Some(&other));
        assert!(h.transactions().is_empty());
        assert!(h.authenticate("9999").is_ok());

        h.reset().unwrap();
        assert!(h.profile().is_none());
        assert!(h.transactions().is_empty());
    }

    #[test]
    fn test_state_survives_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let open = || crate::storage::FileStorage::open(dir.path()).unwrap();
        let mut h = Household::load(Box::new(open()));
        h.register(profile()).unwrap();
        let id = h.add_transaction(expense("12.34"), &now()).unwrap().id().to_string();

        let reloaded = Household::load(Box::new(open()));
        assert_eq!(reloaded.profile(), Some(&profile()));
        assert_eq!(reloaded.transactions().len(), 1);
        assert_eq!(reloaded.transactions()[0].id(), id);
        assert_eq!(
            reloaded.transactions()[0].amount(),
            Amount::from_str("12.34").unwrap()
        );
    }
}
