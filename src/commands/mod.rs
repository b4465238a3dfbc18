//! Command handlers for the budget CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod advise;
mod backup;
mod init;
mod members;
mod report;
mod reset;
mod transactions;

use crate::error::{ErrorType, IntoResult};
use crate::household::Household;
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use advise::advise;
pub use backup::{export, import};
pub use init::init;
pub use members::{add_member, list_members, remove_member};
pub use report::{chart, summary, Chart, SummaryReport};
pub use reset::reset;
pub use transactions::{add, delete, list};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }

    /// Print the whole output, message and structure, as JSON to stdout.
    pub fn print_json(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Unable to serialize the output")?;
        println!("{json}");
        Ok(())
    }
}

/// Loads the household from the storage in the budget home.
pub(crate) fn open(config: &Config) -> Result<Household> {
    let storage = config.storage().pub_result(ErrorType::Storage)?;
    Ok(Household::load(Box::new(storage)))
}

/// Loads the household and checks `pin` against the registered family.
pub(crate) fn unlock(config: &Config, pin: Option<&str>) -> Result<Household> {
    let household = open(config)?;
    let pin = pin
        .context("This command needs the family PIN. Provide it with --pin or BUDGET_PIN.")
        .pub_result(ErrorType::Auth)?;
    household.authenticate(pin).pub_result(ErrorType::Auth)?;
    Ok(household)
}

/// Refuses to continue with a destructive command unless the user passed `--yes`.
fn confirm(yes: bool, warning: &str) -> Result<()> {
    if !yes {
        anyhow::bail!("{warning} Run again with --yes to continue.");
    }
    Ok(())
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}
