//! The advisory collaborator: sends the transaction list to a generative language model and
//! returns its prose report.
//!
//! An `Advisor` never fails. Every problem is turned into one of the fixed messages below, so the
//! caller can display whatever comes back.

mod gemini;

pub use gemini::GeminiAdvisor;

use crate::model::{Category, Transaction};
use async_trait::async_trait;

/// Environment variable holding the API key for the language model service.
pub const API_KEY_ENV: &str = "BUDGET_API_KEY";

pub const MISSING_KEY: &str = "Error: API key not found. Please configure your API key.";
pub const NOT_ENOUGH_DATA: &str =
    "There are not enough transactions to analyze. Please record some income and expenses.";
pub const EMPTY_RESPONSE: &str = "The analysis could not be generated at this time.";
pub const CONNECTION_ERROR: &str =
    "An error occurred while connecting to the AI service. Please try again later.";

/// Categories the report's savings recommendations should focus on.
const ESSENTIAL_CATEGORIES: [Category; 6] = [
    Category::Housing,
    Category::Transport,
    Category::Utilities,
    Category::Food,
    Category::Transfers,
    Category::Tithes,
];

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Returns a Markdown report on `transactions`, or one of the fixed messages.
    async fn analyze(&self, transactions: &[Transaction]) -> String;
}

/// Builds the request sent to the model: a role statement, the transactions as JSON and the
/// structure the report should follow, written in `language`.
pub fn build_prompt(transactions: &[Transaction], language: &str) -> serde_json::Result<String> {
    let data = serde_json::to_string(transactions)?;
    let categories = ESSENTIAL_CATEGORIES
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "Act as an expert personal financial advisor. Analyze the following list of financial \
         transactions (income and expenses) in JSON format.\n\
         \n\
         Data: {data}\n\
         \n\
         Please write a brief, direct report in {language} that includes:\n\
         1. A summary of the current state (financial health).\n\
         2. Identification of excessive spending patterns (if any).\n\
         3. Specific recommendations to improve savings based on the categories {categories}.\n\
         4. A short motivational tip.\n\
         \n\
         Use Markdown formatting to highlight key points.\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_prompt_contents() {
        let date = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let transactions = vec![Transaction::test_new("t1", date, "42.5", Category::Food)];
        let prompt = build_prompt(&transactions, "Spanish").unwrap();
        assert!(prompt.starts_with("Act as an expert personal financial advisor."));
        assert!(prompt.contains(r#""id":"t1""#));
        assert!(prompt.contains(r#""amount":42.5"#));
        assert!(prompt.contains("report in Spanish"));
        assert!(prompt
            .contains("'Housing', 'Transport', 'Utilities', 'Food', 'Transfers', 'Tithes'"));
        assert!(prompt.contains("4. A short motivational tip."));
        assert!(prompt.contains("Markdown"));
    }

    #[test]
    fn test_prompt_with_no_transactions() {
        let prompt = build_prompt(&[], "English").unwrap();
        assert!(prompt.contains("Data: []"));
    }
}
