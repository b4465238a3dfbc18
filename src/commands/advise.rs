use crate::advisor::Advisor;
use crate::args::RangeArgs;
use crate::commands::{unlock, Out};
use crate::engine;
use crate::{Config, Result};
use chrono::Local;
use tracing::info;

/// Sends the transactions in the time range to `advisor` and returns its report.
///
/// The advisor never fails, so apart from an incorrect PIN this always returns a message: either
/// the report or an explanation of why there is none.
pub async fn advise(
    config: Config,
    pin: Option<&str>,
    args: RangeArgs,
    advisor: &dyn Advisor,
) -> Result<Out<String>> {
    let household = unlock(&config, pin)?;
    let selected: Vec<_> = engine::filter(household.transactions(), args.range(), &Local::now())
        .into_iter()
        .cloned()
        .collect();
    info!("Analyzing your finances, please wait...");
    let report = advisor.analyze(&selected).await;
    Ok(Out::new(report.clone(), report))
}
