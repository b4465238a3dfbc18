//! Commands that record, delete and list transactions.

use crate::args::{AddArgs, DeleteArgs, ListArgs};
use crate::commands::{plural, unlock, Out};
use crate::engine::{calendar, Dashboard};
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use chrono::{DateTime, Local, TimeZone};
use tracing::debug;

/// Records a new transaction. The transaction is dated `args.date()`, or today, at the current
/// local time of day.
pub async fn add(config: Config, pin: Option<&str>, args: AddArgs) -> Result<Out<Transaction>> {
    let mut household = unlock(&config, pin)?;
    let now = Local::now();
    let new = NewTransaction {
        date: args.date().unwrap_or_else(|| now.date_naive()),
        amount: args.amount(),
        transaction_type: args.transaction_type(),
        category: args.category(),
        description: args.description().map(str::to_string),
        created_by: args.member().to_string(),
        company: args.company().map(str::to_string),
    };
    debug!("Adding {new:?}");
    // Validation failures come back before anything is written.
    let added = household
        .add_transaction(new, &now)
        .pub_result(ErrorType::Input)?
        .clone();
    Ok(Out::new(
        format!(
            "Recorded {} of {} in {} ({})",
            added.transaction_type(),
            added.amount(),
            added.category(),
            added.id()
        ),
        added,
    ))
}

/// Deletes the transaction with the given ID.
pub async fn delete(
    config: Config,
    pin: Option<&str>,
    args: DeleteArgs,
) -> Result<Out<Transaction>> {
    let mut household = unlock(&config, pin)?;
    let removed = household
        .delete_transaction(args.id())
        .pub_result(ErrorType::Input)?;
    Ok(Out::new(
        format!(
            "Deleted the {} of {} in {}",
            removed.transaction_type(),
            removed.amount(),
            removed.category()
        ),
        removed,
    ))
}

/// Lists the transactions in the time range, narrowed by the type filter, newest first.
pub async fn list(
    config: Config,
    pin: Option<&str>,
    args: ListArgs,
) -> Result<Out<Vec<Transaction>>> {
    let household = unlock(&config, pin)?;
    let now = Local::now();
    let dashboard = Dashboard::compute(
        household.transactions(),
        args.range(),
        args.type_filter(),
        &now,
    );
    let mut message = format!(
        "{} (range: {}, type: {})",
        plural(dashboard.transactions.len(), "transaction", "transactions"),
        dashboard.range,
        dashboard.type_filter
    );
    for t in &dashboard.transactions {
        message.push('\n');
        message.push_str(&format_line(t, &now));
    }
    Ok(Out::new(message, dashboard.transactions))
}

/// One line of the listing, in the local time zone of `now`.
fn format_line<Tz: TimeZone>(t: &Transaction, now: &DateTime<Tz>) -> String {
    let date = calendar::local_date(&t.date(), &now.timezone());
    let sign = if t.is_income() { "+" } else { "-" };
    let detail = match t.company() {
        Some(company) if t.description().is_empty() => company.to_string(),
        Some(company) => format!("{} / {company}", t.description()),
        None => t.description().to_string(),
    };
    format!(
        "{date}  {sign}{:>12}  {:<14}  {detail}  by {}  [{}]",
        t.amount().to_string(),
        t.category().to_string(),
        t.created_by(),
        t.id()
    )
}
