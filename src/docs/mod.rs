use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::Result;

const DOCS_API_BASE: &str = "https://docs.googleapis.com/v1/documents";

/// Trait for the document store the summary is persisted to.
///
/// Writes are not idempotent: running the pipeline twice for the same video
/// appends the summary twice. That is accepted behavior.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append text to an existing document; returns the document URL
    async fn append(&self, heading: &str, text: &str) -> Result<String>;

    /// Create a new document with the given title and body; returns its URL
    async fn create(&self, title: &str, text: &str) -> Result<String>;
}

/// Google Docs client authenticated with a supplied bearer token
pub struct GoogleDocsStore {
    client: Client,
    access_token: String,
    document_id: String,
}

impl GoogleDocsStore {
    pub fn new(access_token: &str, document_id: &str) -> Self {
        Self {
            client: Client::new(),
            access_token: access_token.to_string(),
            document_id: document_id.to_string(),
        }
    }

    fn doc_url(document_id: &str) -> String {
        format!("https://docs.google.com/document/d/{}/edit", document_id)
    }

    /// Insert text at the start of a document body
    async fn insert_text(&self, document_id: &str, text: &str) -> Result<()> {
        let body = json!({
            "requests": [{
                "insertText": {
                    "location": { "index": 1 },
                    "text": text
                }
            }]
        });

        let response = self
            .client
            .post(format!("{}/{}:batchUpdate", DOCS_API_BASE, document_id))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("Google Docs batchUpdate request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Docs returned HTTP {}: {}", status, body);
        }

        Ok(())
    }
}

/// Section text written above each appended summary
fn section_heading(heading: &str) -> String {
    format!(
        "\n\n---\nNew YouTube Summary — {} ({})\n\n",
        heading,
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    )
}

#[async_trait]
impl DocumentStore for GoogleDocsStore {
    async fn append(&self, heading: &str, text: &str) -> Result<String> {
        if self.access_token.is_empty() {
            anyhow::bail!("Google Docs credential is missing");
        }
        if self.document_id.is_empty() {
            anyhow::bail!("No target document configured");
        }

        tracing::info!("Appending summary to document {}", self.document_id);

        let formatted = format!("{}{}\n", section_heading(heading), text);
        self.insert_text(&self.document_id, &formatted).await?;

        Ok(Self::doc_url(&self.document_id))
    }

    /// Create a new document and write the summary into it.
    ///
    /// The document stays private to the token's account; no Drive
    /// permission grant is made, so the returned URL is only readable by
    /// that account until it is shared manually.
    async fn create(&self, title: &str, text: &str) -> Result<String> {
        if self.access_token.is_empty() {
            anyhow::bail!("Google Docs credential is missing");
        }

        tracing::info!("Creating new document: {}", title);

        let response = self
            .client
            .post(DOCS_API_BASE)
            .bearer_auth(&self.access_token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .context("Google Docs create request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Google Docs returned HTTP {}: {}", status, body);
        }

        let created: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Google Docs create response")?;

        let document_id = created["documentId"]
            .as_str()
            .context("Create response carried no documentId")?
            .to_string();

        self.insert_text(&document_id, &format!("{}\n", text)).await?;

        Ok(Self::doc_url(&document_id))
    }
}
