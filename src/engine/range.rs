//! Time-range and type filters over a list of transactions.

use crate::engine::calendar;
use crate::model::{Transaction, TransactionType};
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// The window of time a dashboard looks at, relative to "now".
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Every transaction.
    All,
    /// Transactions in the current calendar month.
    #[default]
    Month,
    /// Transactions since midnight seven calendar days ago.
    Week,
    /// Transactions on the current calendar date.
    Today,
}

serde_plain::derive_display_from_serialize!(TimeRange);
serde_plain::derive_fromstr_from_deserialize!(TimeRange);

impl TimeRange {
    /// Returns a predicate that tells whether a transaction falls within this range at `now`.
    pub fn matcher<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> RangeMatcher<Tz> {
        let today = now.date_naive();
        let week_cutoff = today
            .checked_sub_days(Days::new(7))
            .unwrap_or(NaiveDate::MIN);
        RangeMatcher {
            range: *self,
            tz: now.timezone(),
            today,
            week_start: calendar::local_midnight(week_cutoff, now),
        }
    }
}

/// A `TimeRange` resolved against a particular "now".
#[derive(Debug, Clone)]
pub struct RangeMatcher<Tz: TimeZone> {
    range: TimeRange,
    tz: Tz,
    today: NaiveDate,
    week_start: DateTime<chrono::Utc>,
}

impl<Tz: TimeZone> RangeMatcher<Tz> {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self.range {
            TimeRange::All => true,
            TimeRange::Today => calendar::local_date(&transaction.date, &self.tz) == self.today,
            TimeRange::Week => transaction.date >= self.week_start,
            TimeRange::Month => {
                let date = calendar::local_date(&transaction.date, &self.tz);
                date.month() == self.today.month() && date.year() == self.today.year()
            }
        }
    }
}

/// Returns the transactions that fall within `range` at `now`, in their original order.
pub fn filter<'a, Tz: TimeZone>(
    transactions: &'a [Transaction],
    range: TimeRange,
    now: &DateTime<Tz>,
) -> Vec<&'a Transaction> {
    let matcher = range.matcher(now);
    transactions.iter().filter(|t| matcher.matches(t)).collect()
}

/// Restricts a transaction listing to one type, or leaves it unchanged.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TypeFilter);
serde_plain::derive_fromstr_from_deserialize!(TypeFilter);

impl TypeFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => transaction.transaction_type == TransactionType::Income,
            TypeFilter::Expense => transaction.transaction_type == TransactionType::Expense,
        }
    }
}
