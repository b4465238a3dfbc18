use serde::{Deserialize, Serialize};

/// Whether a transaction brings money in or sends it out.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The closed set of transaction categories. Each category belongs to exactly one
/// `TransactionType`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Business,
    #[serde(rename = "Other Income")]
    OtherIncome,
    Housing,
    Transport,
    Utilities,
    Food,
    Transfers,
    Tithes,
    #[serde(rename = "Other Expense")]
    OtherExpense,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

/// Income categories in display order.
pub const INCOME_CATEGORIES: [Category; 3] =
    [Category::Salary, Category::Business, Category::OtherIncome];

/// Expense categories in display order.
pub const EXPENSE_CATEGORIES: [Category; 7] = [
    Category::Housing,
    Category::Transport,
    Category::Utilities,
    Category::Food,
    Category::Transfers,
    Category::Tithes,
    Category::OtherExpense,
];

/// Essential, recurring expense categories counted as fixed expenses.
pub const FIXED_CATEGORIES: [Category; 5] = [
    Category::Housing,
    Category::Utilities,
    Category::Tithes,
    Category::Transport,
    Category::Transfers,
];

impl Category {
    /// The `TransactionType` this category belongs to.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Category::Salary | Category::Business | Category::OtherIncome => {
                TransactionType::Income
            }
            Category::Housing
            | Category::Transport
            | Category::Utilities
            | Category::Food
            | Category::Transfers
            | Category::Tithes
            | Category::OtherExpense => TransactionType::Expense,
        }
    }

    pub fn is_fixed(&self) -> bool {
        FIXED_CATEGORIES.contains(self)
    }

    /// All categories available for `transaction_type`.
    pub fn for_type(transaction_type: TransactionType) -> &'static [Category] {
        match transaction_type {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }
}
