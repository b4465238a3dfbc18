//! The derived-metrics engine: time-range filtering, summaries, budget status, daily time series
//! and category breakdowns. Every function here is pure; results are recomputed from the
//! transaction list whenever it or the selected range changes.

pub mod calendar;
mod categories;
mod dashboard;
mod range;
mod series;
mod status;
mod summary;

pub use categories::{category_breakdown, CategoryShare};
pub use dashboard::Dashboard;
pub use range::{filter, RangeMatcher, TimeRange, TypeFilter};
pub use series::{time_series, DailyBucket};
pub use status::{BudgetStatus, Status};
pub use summary::Summary;
