//! Types that represent the core data model, such as `Transaction` and `FamilyProfile`.
mod amount;
mod category;
mod family;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{
    Category, TransactionType, EXPENSE_CATEGORIES, FIXED_CATEGORIES, INCOME_CATEGORIES,
};
pub use family::{FamilyProfile, Pin};
pub use transaction::{NewTransaction, Transaction};
