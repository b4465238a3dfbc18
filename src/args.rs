//! These structs provide the CLI interface for the budget CLI.

use crate::engine::{TimeRange, TypeFilter};
use crate::model::{Amount, Category, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A command-line tool for keeping a family budget.
///
/// Record the income and expenses of your family, see where the money goes for the current
/// month, week or day, keep backups of your data and ask an AI advisor for a short report on
/// your finances.
///
/// Start with `budget init` to register your family. Every other command needs the family PIN,
/// given with --pin or BUDGET_PIN.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and register your family.
    ///
    /// This is the first command you should run. The PIN given with --pin becomes the family PIN
    /// and must be exactly 4 digits.
    Init(InitArgs),
    /// Record an income or an expense.
    Add(AddArgs),
    /// Delete a transaction by its ID.
    Delete(DeleteArgs),
    /// List transactions, newest first.
    List(ListArgs),
    /// Show income, expenses, savings and the budget status.
    Summary(RangeArgs),
    /// Show the daily cash flow and the spending per category.
    Chart(RangeArgs),
    /// Show, add or remove family members.
    Members(MembersArgs),
    /// Write all data to a backup file.
    Export(ExportArgs),
    /// Replace all data on this device with the contents of a backup file.
    Import(ImportArgs),
    /// Ask the AI advisor for a report on your finances. Needs BUDGET_API_KEY.
    Advise(RangeArgs),
    /// Delete the family and every transaction from this device.
    Reset(ResetArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget data and configuration is held. Defaults to ~/budget
    #[arg(long, global = true, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,

    /// The family's 4-digit PIN.
    #[arg(long, global = true, env = "BUDGET_PIN", hide_env_values = true)]
    pin: Option<String>,

    /// Print the command's structured output as JSON to stdout.
    #[arg(long, global = true)]
    json: bool,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf, pin: Option<String>) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
            pin,
            json: false,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }

    pub fn pin(&self) -> Option<&str> {
        self.pin.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The name of your family.
    #[arg(long)]
    family_name: String,

    /// A family member who records transactions. Repeat for each member.
    #[arg(long = "member", required = true)]
    members: Vec<String>,
}

impl InitArgs {
    pub fn new(family_name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            family_name: family_name.into(),
            members,
        }
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// (Not shown): Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Whether money came in or went out.
    #[arg(value_enum)]
    transaction_type: TransactionType,

    /// The amount, e.g. 1250.50 or "$1,250.50". Must be greater than zero.
    #[arg(long)]
    amount: Amount,

    /// The category, e.g. Salary, Food or "Other Expense".
    #[arg(long)]
    category: Category,

    /// What the money was for. Required for expenses.
    #[arg(long)]
    description: Option<String>,

    /// The family member recording the transaction.
    #[arg(long)]
    member: String,

    /// Who paid. Required for income.
    #[arg(long)]
    company: Option<String>,

    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn new(
        transaction_type: TransactionType,
        amount: Amount,
        category: Category,
        member: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            category,
            description: None,
            member: member.into(),
            company: None,
            date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// (Not shown): Args for the `budget delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the transaction, as shown by `budget list`.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `budget list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[clap(flatten)]
    range: RangeArgs,

    /// Only show income or only show expenses.
    #[arg(long = "type", value_enum, default_value_t = TypeFilter::All)]
    type_filter: TypeFilter,
}

impl ListArgs {
    pub fn new(range: TimeRange, type_filter: TypeFilter) -> Self {
        Self {
            range: RangeArgs::new(range),
            type_filter,
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range.range()
    }

    pub fn type_filter(&self) -> TypeFilter {
        self.type_filter
    }
}

/// (Not shown): The time range used by reporting commands.
#[derive(Debug, Parser, Clone)]
pub struct RangeArgs {
    /// Which transactions to include: all, month, week or today.
    #[arg(long, value_enum, default_value_t = TimeRange::Month)]
    range: TimeRange,
}

impl RangeArgs {
    pub fn new(range: TimeRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }
}

/// (Not shown): Args for the `budget members` command.
#[derive(Debug, Parser, Clone)]
pub struct MembersArgs {
    #[command(subcommand)]
    action: Option<MembersCommand>,
}

impl MembersArgs {
    pub fn new(action: Option<MembersCommand>) -> Self {
        Self { action }
    }

    pub fn action(&self) -> Option<&MembersCommand> {
        self.action.as_ref()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MembersCommand {
    /// List the family members (the default).
    List,
    /// Add a family member.
    Add { name: String },
    /// Remove every family member with this name.
    Remove { name: String },
}

/// (Not shown): Args for the `budget export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The directory the backup file is written to.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

impl ExportArgs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// (Not shown): Args for the `budget import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The backup file created by `budget export`.
    file: PathBuf,

    /// Confirm that the data on this device will be overwritten.
    #[arg(long)]
    yes: bool,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>, yes: bool) -> Self {
        Self {
            file: file.into(),
            yes,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// (Not shown): Args for the `budget reset` command.
#[derive(Debug, Parser, Clone)]
pub struct ResetArgs {
    /// Confirm that all data on this device will be deleted.
    #[arg(long)]
    yes: bool,
}

impl ResetArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
