use crate::model::{Amount, Transaction};
use serde::{Deserialize, Serialize};

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total_income: Amount,
    pub total_expense: Amount,
    /// Income minus expense. Negative when the family spent more than it earned.
    pub net_savings: Amount,
    /// The part of `total_expense` spent in the fixed categories.
    pub fixed_expenses: Amount,
}

impl Summary {
    pub fn compute<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut total_income = Amount::ZERO;
        let mut total_expense = Amount::ZERO;
        let mut fixed_expenses = Amount::ZERO;
        for t in transactions {
            if t.is_income() {
                total_income += t.amount;
            } else {
                total_expense += t.amount;
                if t.category.is_fixed() {
                    fixed_expenses += t.amount;
                }
            }
        }
        Self {
            total_income,
            total_expense,
            net_savings: total_income - total_expense,
            fixed_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn t(id: &str, amount: &str, category: Category) -> Transaction {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Transaction::test_new(id, date, amount, category)
    }

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_income_and_expense() {
        let list = vec![
            t("1", "100", Category::Salary),
            t("2", "40", Category::Food),
        ];
        let s = Summary::compute(&list);
        assert_eq!(s.total_income, amt("100"));
        assert_eq!(s.total_expense, amt("40"));
        assert_eq!(s.net_savings, amt("60"));
        assert_eq!(s.fixed_expenses, Amount::ZERO);
    }

    #[test]
    fn test_fixed_expenses_subset() {
        let list = vec![
            t("1", "500", Category::Housing),
            t("2", "80.10", Category::Utilities),
            t("3", "50", Category::Tithes),
            t("4", "30.20", Category::Transport),
            t("5", "20", Category::Transfers),
            t("6", "99.99", Category::Food),
            t("7", "10", Category::OtherExpense),
        ];
        let s = Summary::compute(&list);
        assert_eq!(s.fixed_expenses, amt("680.30"));
        assert_eq!(s.total_expense, amt("790.29"));
        assert!(s.fixed_expenses <= s.total_expense);
        assert_eq!(s.net_savings, amt("-790.29"));
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let list = vec![
            t("1", "0.10", Category::Business),
            t("2", "0.20", Category::OtherIncome),
        ];
        assert_eq!(Summary::compute(&list).total_income, amt("0.3"));
    }

    #[test]
    fn test_many_transactions_at_the_limit() {
        let max = Amount::max_transaction().to_string();
        let list: Vec<Transaction> = (0..1000)
            .map(|i| {
                let category = if i % 2 == 0 {
                    Category::Food
                } else {
                    Category::Salary
                };
                t(&i.to_string(), &max, category)
            })
            .collect();
        let s = Summary::compute(&list);
        assert_eq!(s.total_expense, amt("500000000000000"));
        assert_eq!(s.total_income, s.total_expense);
        assert!(s.net_savings.is_zero());
    }

    #[test]
    fn test_empty() {
        let s = Summary::compute(&Vec::<Transaction>::new());
        assert_eq!(s, Summary::default());
    }
}
