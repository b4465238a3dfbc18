use crate::engine::calendar;
use crate::model::{Amount, Category, TransactionType};
use crate::utils::generate_transaction_id;
use crate::Result;
use anyhow::{bail, ensure};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One financial event: money coming in or going out.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Missing IDs are tolerated on load and repaired by the transaction store.
    #[serde(default)]
    pub(crate) id: String,
    pub(crate) date: DateTime<Utc>,
    pub(crate) amount: Amount,
    #[serde(rename = "type")]
    pub(crate) transaction_type: TransactionType,
    pub(crate) category: Category,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) company: Option<String>,
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// The user-supplied data for a transaction that has not been recorded yet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTransaction {
    /// The calendar date of the event in the user's time zone.
    pub date: NaiveDate,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub description: Option<String>,
    pub created_by: String,
    pub company: Option<String>,
}

impl NewTransaction {
    /// Validates the input and builds a `Transaction` with a freshly generated ID.
    ///
    /// The transaction instant is `date` at the current local time-of-day of `now`, so that the
    /// calendar date the user entered is the one the transaction lands on in their time zone.
    ///
    /// # Errors
    /// - The amount is not positive, has fractions of a cent or is above
    ///   `Amount::max_transaction`.
    /// - The category does not belong to the transaction type.
    /// - `created_by` is not one of `members`.
    /// - An expense has no description, or an income has no company.
    pub fn into_transaction<Tz: TimeZone>(
        self,
        members: &[String],
        now: &DateTime<Tz>,
    ) -> Result<Transaction> {
        ensure!(
            self.amount.is_positive(),
            "The amount must be greater than zero, got {}",
            self.amount
        );
        ensure!(
            self.amount.is_whole_cents(),
            "The amount can have at most two decimal places, got {}",
            self.amount.value()
        );
        ensure!(
            self.amount <= Amount::max_transaction(),
            "The amount cannot be more than {}, got {}",
            Amount::max_transaction(),
            self.amount
        );
        if self.category.transaction_type() != self.transaction_type {
            let allowed: Vec<String> = Category::for_type(self.transaction_type)
                .iter()
                .map(|c| c.to_string())
                .collect();
            bail!(
                "The category '{}' cannot be used for {} transactions, expected one of: {}",
                self.category,
                self.transaction_type,
                allowed.join(", ")
            );
        }
        let created_by = self.created_by.trim().to_string();
        ensure!(
            members.iter().any(|m| m == &created_by),
            "'{created_by}' is not a member of this family"
        );

        let description = non_blank(self.description);
        let company = non_blank(self.company);
        match self.transaction_type {
            TransactionType::Expense => {
                ensure!(description.is_some(), "An expense requires a description")
            }
            TransactionType::Income => {
                ensure!(company.is_some(), "An income requires a company or source")
            }
        }

        Ok(Transaction {
            id: generate_transaction_id(),
            date: calendar::local_instant(self.date, now),
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            description: description.unwrap_or_default(),
            created_by,
            company,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
impl Transaction {
    /// Builds a transaction directly, deriving the type from the category.
    pub(crate) fn test_new(
        id: &str,
        date: DateTime<Utc>,
        amount: &str,
        category: Category,
    ) -> Self {
        use std::str::FromStr;
        Self {
            id: id.to_string(),
            date,
            amount: Amount::from_str(amount).unwrap(),
            transaction_type: category.transaction_type(),
            category,
            description: format!("{category} test"),
            created_by: "Ana".to_string(),
            company: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike};
    use std::str::FromStr;

    fn members() -> Vec<String> {
        vec!["Ana".to_string(), "Luis".to_string()]
    }

    fn expense() -> NewTransaction {
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            amount: Amount::from_str("40").unwrap(),
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            description: Some(" groceries ".to_string()),
            created_by: "Luis".to_string(),
            company: None,
        }
    }

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 12, 21, 30, 15)
            .unwrap()
    }

    #[test]
    fn test_into_transaction_keeps_local_date() {
        let now = now();
        let t = expense().into_transaction(&members(), &now).unwrap();
        // 21:30 at UTC-5 is the next day in UTC, but the local date must be preserved.
        let local = t.date().with_timezone(now.offset());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!((local.hour(), local.minute(), local.second()), (21, 30, 15));
        assert_eq!(t.date().day(), 11);
        assert_eq!(t.description(), "groceries");
        assert_eq!(t.created_by(), "Luis");
        assert!(!t.id().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut n = expense();
        n.amount = Amount::ZERO;
        assert!(n.into_transaction(&members(), &now()).is_err());
    }

    #[test]
    fn test_rejects_fractions_of_a_cent() {
        let mut n = expense();
        n.amount = Amount::from_str("0.123456789012345678").unwrap();
        let e = n.into_transaction(&members(), &now()).unwrap_err();
        assert!(e.to_string().contains("at most two decimal places"));
    }

    #[test]
    fn test_amount_limit() {
        let mut n = expense();
        n.amount = Amount::max_transaction();
        let t = n.clone().into_transaction(&members(), &now()).unwrap();
        assert_eq!(t.amount(), Amount::max_transaction());

        n.amount = Amount::from_str("1000000000000.01").unwrap();
        assert!(n.clone().into_transaction(&members(), &now()).is_err());
        n.amount = Amount::from_str("99999999999999999999").unwrap();
        assert!(n.into_transaction(&members(), &now()).is_err());
    }

    #[test]
    fn test_accepted_amounts_survive_json() {
        for amount in ["19.99", "0.01", "999999999999.99", "1000000000000"] {
            let mut n = expense();
            n.amount = Amount::from_str(amount).unwrap();
            let t = n.into_transaction(&members(), &now()).unwrap();
            let json = serde_json::to_string(&t).unwrap();
            let back: Transaction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn test_rejects_category_of_wrong_type() {
        let mut n = expense();
        n.category = Category::Salary;
        let e = n.into_transaction(&members(), &now()).unwrap_err();
        assert!(e.to_string().contains("cannot be used for expense"));
    }

    #[test]
    fn test_rejects_unknown_member() {
        let mut n = expense();
        n.created_by = "Pedro".to_string();
        let e = n.into_transaction(&members(), &now()).unwrap_err();
        assert!(e.to_string().contains("not a member"));
    }

    #[test]
    fn test_expense_requires_description() {
        let mut n = expense();
        n.description = Some("   ".to_string());
        assert!(n.into_transaction(&members(), &now()).is_err());
    }

    #[test]
    fn test_income_requires_company() {
        let mut n = expense();
        n.transaction_type = TransactionType::Income;
        n.category = Category::Salary;
        n.description = None;
        assert!(n.clone().into_transaction(&members(), &now()).is_err());
        n.company = Some("Acme".to_string());
        let t = n.into_transaction(&members(), &now()).unwrap();
        assert_eq!(t.company(), Some("Acme"));
        assert_eq!(t.description(), "");
        assert!(t.is_income());
    }

    #[test]
    fn test_json_field_names() {
        let t = expense().into_transaction(&members(), &now()).unwrap();
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["createdBy"], "Luis");
        assert_eq!(json["amount"], 40);
        assert!(json.get("company").is_none());
    }

    #[test]
    fn test_deserialize_without_id() {
        let json = r#"{
            "date": "2025-10-05T14:03:00.000Z",
            "amount": 12.5,
            "type": "income",
            "category": "Business",
            "createdBy": "Ana",
            "company": "Shop"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.id(), "");
        assert_eq!(t.description(), "");
        assert_eq!(t.amount(), Amount::from_str("12.5").unwrap());
    }
}
