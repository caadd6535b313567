use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Result;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PROMPT_PREFIX: &str = "Summarize the following YouTube transcript into clear, \
structured, and concise notes. Use bullet points or sections if helpful:\n\n";

/// Default character budget for the transcript portion of the prompt,
/// keeping requests inside the upstream input-size limit
pub const DEFAULT_TRUNCATION_CAP: usize = 12_000;

/// Trait for generative-text backends that condense a transcript
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a summary for a non-empty transcript.
    ///
    /// An empty or whitespace-only transcript is a precondition violation
    /// and must be rejected with an error, not a placeholder string.
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

/// Build the model prompt: fixed instruction prefix plus the transcript,
/// truncated to `cap` characters on a character boundary.
pub fn build_prompt(transcript: &str, cap: usize) -> String {
    let truncated: String = transcript.chars().take(cap).collect();
    format!("{}{}", PROMPT_PREFIX, truncated)
}

/// Gemini generateContent client
pub struct GeminiSummarizer {
    client: Client,
    model: String,
    api_key: String,
    truncation_cap: usize,
}

impl GeminiSummarizer {
    pub fn new(model: &str, api_key: &str, truncation_cap: usize) -> Self {
        Self {
            client: Client::new(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            truncation_cap,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            anyhow::bail!("Transcript is empty");
        }

        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: build_prompt(transcript, self.truncation_cap),
                }],
            }],
        };

        tracing::debug!("Requesting summary from Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned HTTP {}: {}", status, body);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let summary = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
            .trim()
            .to_string();

        if summary.is_empty() {
            anyhow::bail!("Gemini returned no candidates");
        }

        Ok(summary)
    }
}
