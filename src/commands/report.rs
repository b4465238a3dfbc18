//! Reporting commands: the summary with its budget status and the chart data.

use crate::args::RangeArgs;
use crate::commands::{unlock, Out};
use crate::engine::{
    BudgetStatus, CategoryShare, DailyBucket, Dashboard, Status, Summary, TypeFilter,
};
use crate::{Config, Result};
use chrono::Local;
use serde::Serialize;
use std::fmt::Write;

/// The structured output of `summary`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub summary: Summary,
    pub status: BudgetStatus,
}

/// The structured output of `chart`.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub time_series: Vec<DailyBucket>,
    pub categories: Vec<CategoryShare>,
}

/// Shows the totals for the time range and warns when spending is close to or above income.
pub async fn summary(
    config: Config,
    pin: Option<&str>,
    args: RangeArgs,
) -> Result<Out<SummaryReport>> {
    let household = unlock(&config, pin)?;
    let dashboard = Dashboard::compute(
        household.transactions(),
        args.range(),
        TypeFilter::All,
        &Local::now(),
    );
    let s = &dashboard.summary;
    let mut message = format!(
        "Summary for range '{}'\n\
         Income:          {}\n\
         Expenses:        {}\n\
         Net savings:     {}\n\
         Fixed expenses:  {}\n\
         Status:          {}",
        dashboard.range,
        s.total_income,
        s.total_expense,
        s.net_savings,
        s.fixed_expenses,
        dashboard.status.status
    );
    if let Some(alert) = alert(&dashboard.status) {
        message.push('\n');
        message.push_str(&alert);
    }
    Ok(Out::new(
        message,
        SummaryReport {
            summary: dashboard.summary,
            status: dashboard.status,
        },
    ))
}

/// Shows the daily cash flow and the spending per category for the time range.
pub async fn chart(config: Config, pin: Option<&str>, args: RangeArgs) -> Result<Out<Chart>> {
    let household = unlock(&config, pin)?;
    let dashboard = Dashboard::compute(
        household.transactions(),
        args.range(),
        TypeFilter::All,
        &Local::now(),
    );

    let mut message = format!("Daily cash flow for range '{}'", dashboard.range);
    if dashboard.time_series.is_empty() {
        message.push_str("\n  (no transactions)");
    }
    for b in &dashboard.time_series {
        let _ = write!(
            message,
            "\n  {}  income {:>12}  expense {:>12}  balance {:>12}  cumulative {:>12}",
            b.display_date,
            b.income.to_string(),
            b.expense.to_string(),
            b.balance.to_string(),
            b.cumulative.to_string()
        );
    }
    message.push_str("\nSpending by category");
    if dashboard.categories.is_empty() {
        message.push_str("\n  (no expenses)");
    }
    for c in &dashboard.categories {
        let _ = write!(
            message,
            "\n  {:<14} {:>12}  {:>5}%",
            c.category.to_string(),
            c.total.to_string(),
            c.percent_of_total.round_dp(1).to_string()
        );
    }

    Ok(Out::new(
        message,
        Chart {
            time_series: dashboard.time_series,
            categories: dashboard.categories,
        },
    ))
}

fn alert(status: &BudgetStatus) -> Option<String> {
    let headline = match status.status {
        Status::Danger => "Critical alert! Your expenses have exceeded your income.",
        Status::Warning => "Warning! You are very close to exceeding your budget.",
        Status::Healthy | Status::Neutral => return None,
    };
    let mut alert = format!("{headline} We recommend reviewing your finances urgently.");
    if let Some(category) = status.top_category {
        let _ = write!(
            alert,
            " The category where you are currently spending the most is {}.",
            category.to_string().to_uppercase()
        );
    }
    Some(alert)
}
