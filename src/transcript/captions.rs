use async_trait::async_trait;
use reqwest::Client;

use super::events::{parse_events, TranscriptFragment};
use super::TranscriptSource;
use crate::video::VideoRef;
use crate::Result;

const TIMEDTEXT_URL: &str = "https://video.google.com/timedtext";
const DEFAULT_LANGUAGE: &str = "en";

/// Structured caption API source.
///
/// Queries the timedtext endpoint for json3-format captions. Many videos
/// have no track here (the endpoint answers 200 with an empty body), which
/// the chain treats as fall-through to the next source.
pub struct CaptionApiSource {
    client: Client,
    language: String,
}

impl CaptionApiSource {
    pub fn new() -> Self {
        Self::with_language(DEFAULT_LANGUAGE)
    }

    pub fn with_language(language: &str) -> Self {
        Self {
            client: Client::new(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl TranscriptSource for CaptionApiSource {
    async fn fetch_fragments(&self, video: &VideoRef) -> Result<Vec<TranscriptFragment>> {
        tracing::debug!("Requesting captions for {} via timedtext API", video);

        let response = self
            .client
            .get(TIMEDTEXT_URL)
            .query(&[
                ("v", video.as_str()),
                ("lang", self.language.as_str()),
                ("fmt", "json3"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Caption API returned HTTP {}", response.status());
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            // No caption track published for this language
            return Ok(Vec::new());
        }

        parse_events(&body)
    }

    fn source_name(&self) -> &'static str {
        "caption-api"
    }
}

impl Default for CaptionApiSource {
    fn default() -> Self {
        Self::new()
    }
}
