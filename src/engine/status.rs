use crate::engine::categories::expense_totals;
use crate::engine::Summary;
use crate::model::{Amount, Category, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How spending compares to income.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// There is no income to compare against.
    Neutral,
    /// Spending is below 90% of income.
    Healthy,
    /// Spending is at least 90% of income but does not exceed it.
    Warning,
    /// Spending exceeds income.
    Danger,
}

serde_plain::derive_display_from_serialize!(Status);

/// The budget health of a set of transactions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetStatus {
    pub status: Status,
    /// The expense category with the most spending, reported only for `Warning` and `Danger`.
    pub top_category: Option<Category>,
}

impl BudgetStatus {
    /// Classifies `summary`, which must have been computed from `transactions`.
    pub fn classify<'a>(
        summary: &Summary,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        let income = summary.total_income.value();
        let expense = summary.total_expense.value();
        if income.is_zero() {
            return Self {
                status: Status::Neutral,
                top_category: None,
            };
        }

        let over = expense > income;
        let near = !over && expense >= income * Decimal::new(90, 2);
        let status = if over {
            Status::Danger
        } else if near {
            Status::Warning
        } else {
            Status::Healthy
        };
        let top_category = match status {
            Status::Danger | Status::Warning => top_expense_category(transactions),
            Status::Neutral | Status::Healthy => None,
        };
        Self {
            status,
            top_category,
        }
    }
}

/// The category with the largest expense total; on a tie the first one seen wins.
fn top_expense_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Option<Category> {
    let mut top: Option<(Category, Amount)> = None;
    for (category, total) in expense_totals(transactions) {
        match top {
            Some((_, best)) if total <= best => {}
            _ => top = Some((category, total)),
        }
    }
    top.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t(id: &str, amount: &str, category: Category) -> Transaction {
        let date = Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap();
        Transaction::test_new(id, date, amount, category)
    }

    fn classify(list: &[Transaction]) -> BudgetStatus {
        let summary = Summary::compute(list);
        BudgetStatus::classify(&summary, list)
    }

    #[test]
    fn test_healthy_has_no_top_category() {
        let list = vec![t("1", "100", Category::Salary), t("2", "40", Category::Food)];
        assert_eq!(
            classify(&list),
            BudgetStatus {
                status: Status::Healthy,
                top_category: None
            }
        );
    }

    #[test]
    fn test_warning_reports_top_category() {
        let list = vec![t("1", "100", Category::Salary), t("2", "95", Category::Housing)];
        assert_eq!(
            classify(&list),
            BudgetStatus {
                status: Status::Warning,
                top_category: Some(Category::Housing)
            }
        );
    }

    #[test]
    fn test_exactly_ninety_percent_is_warning() {
        let list = vec![t("1", "100", Category::Salary), t("2", "90", Category::Food)];
        assert_eq!(classify(&list).status, Status::Warning);
        let list = vec![t("1", "100", Category::Salary), t("2", "89.99", Category::Food)];
        assert_eq!(classify(&list).status, Status::Healthy);
    }

    #[test]
    fn test_equal_income_and_expense_is_warning() {
        let list = vec![t("1", "100", Category::Salary), t("2", "100", Category::Food)];
        assert_eq!(classify(&list).status, Status::Warning);
    }

    #[test]
    fn test_danger() {
        let list = vec![
            t("1", "100", Category::Salary),
            t("2", "70", Category::Food),
            t("3", "50", Category::Transport),
        ];
        assert_eq!(
            classify(&list),
            BudgetStatus {
                status: Status::Danger,
                top_category: Some(Category::Food)
            }
        );
    }

    #[test]
    fn test_neutral_without_income() {
        let list = vec![t("1", "70", Category::Food)];
        assert_eq!(
            classify(&list),
            BudgetStatus {
                status: Status::Neutral,
                top_category: None
            }
        );
        assert_eq!(classify(&[]).status, Status::Neutral);
    }

    #[test]
    fn test_top_category_tie_goes_to_first_seen() {
        let list = vec![
            t("1", "100", Category::Salary),
            t("2", "30", Category::Utilities),
            t("3", "60", Category::Food),
            t("4", "30", Category::Utilities),
        ];
        assert_eq!(classify(&list).top_category, Some(Category::Utilities));
    }
}
