use crate::engine::calendar;
use crate::model::{Amount, Transaction};
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The income, expense and running balance for one local calendar day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyBucket {
    /// `YYYY-MM-DD` in the local time zone.
    pub date_key: String,
    /// A short label for charts, e.g. `05 Oct`.
    pub display_date: String,
    pub income: Amount,
    pub expense: Amount,
    /// Income minus expense for this day alone.
    pub balance: Amount,
    /// The sum of `balance` over this and every earlier bucket.
    pub cumulative: Amount,
}

/// Groups transactions into one bucket per local calendar day in `tz`, oldest first.
pub fn time_series<'a, Tz: TimeZone>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    tz: &Tz,
) -> Vec<DailyBucket> {
    let mut days: BTreeMap<NaiveDate, (Amount, Amount)> = BTreeMap::new();
    for t in transactions {
        let day = days
            .entry(calendar::local_date(&t.date, tz))
            .or_insert((Amount::ZERO, Amount::ZERO));
        if t.is_income() {
            day.0 += t.amount;
        } else {
            day.1 += t.amount;
        }
    }

    let mut cumulative = Amount::ZERO;
    days.into_iter()
        .map(|(date, (income, expense))| {
            let balance = income - expense;
            cumulative += balance;
            DailyBucket {
                date_key: calendar::date_key(date),
                display_date: date.format("%d %b").to_string(),
                income,
                expense,
                balance,
                cumulative,
            }
        })
        .collect()
}
