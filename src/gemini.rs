use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::GenerateError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Candidate models, most preferred first
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-exp",
    "gemini-2.0-flash",
    "gemini-1.5-pro",
    "gemini-pro",
];

/// Anything that can turn a prompt into text
#[async_trait]
pub trait Generator: Send + Sync {
    /// Model identifier, used in logs and failure reports
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// One Gemini model reached through the Generative Language API
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiModel {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Generator for GeminiModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        debug!("Generating content with {} ({} chars)", self.model, prompt.chars().count());

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Status { status, body });
        }

        let json: serde_json::Value = resp.json().await?;
        extract_gemini_text(&json)
    }
}

/// Concatenate `candidates[0].content.parts[*].text`
fn extract_gemini_text(json: &serde_json::Value) -> Result<String, GenerateError> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or(GenerateError::Malformed)?;

    let text = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(GenerateError::Empty);
    }
    Ok(text)
}
