use crate::model::{Amount, Category, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The spending in one expense category and its share of all spending.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryShare {
    pub category: Category,
    pub total: Amount,
    /// Percentage of the total expense, from 0 to 100.
    pub percent_of_total: Decimal,
}

/// Sums expense amounts per category in the order each category is first seen.
pub(crate) fn expense_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<(Category, Amount)> {
    let mut totals: Vec<(Category, Amount)> = Vec::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, total)) => *total += t.amount,
            None => totals.push((t.category, t.amount)),
        }
    }
    totals
}

/// Groups expenses by category, largest first. Categories with equal totals keep the order in
/// which they were first seen. Income transactions are ignored.
pub fn category_breakdown<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryShare> {
    let totals = expense_totals(transactions);
    let grand_total: Amount = totals.iter().map(|(_, a)| *a).sum();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .filter(|(_, total)| !total.is_zero())
        .map(|(category, total)| CategoryShare {
            category,
            total,
            percent_of_total: percent(total, grand_total),
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}

fn percent(part: Amount, whole: Amount) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.value() / whole.value() * Decimal::ONE_HUNDRED
}
