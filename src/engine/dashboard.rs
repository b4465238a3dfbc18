use crate::engine::{
    category_breakdown, filter, time_series, BudgetStatus, CategoryShare, DailyBucket, Summary,
    TimeRange, TypeFilter,
};
use crate::model::Transaction;
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Everything derived from the transaction list for one time range, as shown on a dashboard.
///
/// The summary, status and charts cover every transaction in the time range. Only the listing in
/// `transactions` is narrowed further by the type filter.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub range: TimeRange,
    pub type_filter: TypeFilter,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub status: BudgetStatus,
    pub time_series: Vec<DailyBucket>,
    pub categories: Vec<CategoryShare>,
}

impl Dashboard {
    pub fn compute<Tz: TimeZone>(
        transactions: &[Transaction],
        range: TimeRange,
        type_filter: TypeFilter,
        now: &DateTime<Tz>,
    ) -> Self {
        let in_range = filter(transactions, range, now);
        let summary = Summary::compute(in_range.iter().copied());
        let status = BudgetStatus::classify(&summary, in_range.iter().copied());
        let time_series = time_series(in_range.iter().copied(), &now.timezone());
        let categories = category_breakdown(in_range.iter().copied());
        let listed = in_range
            .iter()
            .filter(|t| type_filter.matches(t))
            .map(|t| (*t).clone())
            .collect();
        Self {
            range,
            type_filter,
            transactions: listed,
            summary,
            status,
            time_series,
            categories,
        }
    }
}
