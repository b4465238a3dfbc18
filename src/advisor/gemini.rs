//! Advisor backed by the Gemini `generateContent` REST API.

use super::{
    build_prompt, Advisor, API_KEY_ENV, CONNECTION_ERROR, EMPTY_RESPONSE, MISSING_KEY,
    NOT_ENOUGH_DATA,
};
use crate::config::AdvisorSettings;
use crate::model::Transaction;
use crate::Result;
use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, trace};

/// Sends a single `generateContent` request per analysis. There is no retry.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    http_client: Client,
    base_url: String,
    model: String,
    language: String,
    api_key: Option<String>,
}

impl GeminiAdvisor {
    pub fn new(settings: &AdvisorSettings, api_key: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            http_client,
            base_url: settings
                .endpoint_url()?
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            model: settings.model.clone(),
            language: settings.language.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Creates an advisor with the API key read from `BUDGET_API_KEY`.
    pub fn from_env(settings: &AdvisorSettings) -> Result<Self> {
        Self::new(settings, std::env::var(API_KEY_ENV).ok())
    }

    /// Returns the model's text, or `None` when the response carries no text.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Sending analysis request to {url}");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .context("Request to the AI service failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("AI service error {status}: {body}");
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .context("Unable to parse the AI service response")?;
        Ok(response.text())
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn analyze(&self, transactions: &[Transaction]) -> String {
        let Some(api_key) = &self.api_key else {
            return MISSING_KEY.to_string();
        };
        if transactions.is_empty() {
            return NOT_ENOUGH_DATA.to_string();
        }
        let prompt = match build_prompt(transactions, &self.language) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Unable to serialize transactions for the prompt: {e}");
                return EMPTY_RESPONSE.to_string();
            }
        };
        trace!("Prompt: {prompt}");

        match self.generate(api_key, &prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_RESPONSE.to_string(),
            Err(e) => {
                error!("Error calling the AI service: {e:#}");
                CONNECTION_ERROR.to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// The concatenated text parts of the first candidate, if there is any non-blank text.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
