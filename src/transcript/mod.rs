use async_trait::async_trait;

pub mod captions;
pub mod events;
pub mod ytdlp;

pub use events::{join_fragments, parse_events, TranscriptFragment};

use crate::video::VideoRef;
use crate::Result;

/// Outcome of one pass over the source chain
#[derive(Debug)]
pub enum FetchOutcome {
    /// Non-empty transcript text, already joined and trimmed
    Success(String),

    /// Every source completed but none produced any text
    Empty,

    /// At least one source raised a hard error; carries the last one
    Failed(anyhow::Error),
}

/// Trait for obtaining caption fragments from one concrete source
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch raw caption fragments for a video.
    ///
    /// An `Ok` with an empty sequence means the source completed but has no
    /// captions for this video; a hard failure is an `Err`.
    async fn fetch_fragments(&self, video: &VideoRef) -> Result<Vec<TranscriptFragment>>;

    /// Get the name of this source, for logs and diagnostics
    fn source_name(&self) -> &'static str;
}

/// Ordered fallback chain over transcript sources
pub struct SourceChain {
    sources: Vec<Box<dyn TranscriptSource>>,
    join_delimiter: String,
}

impl SourceChain {
    /// Create a chain with the default source order: the structured caption
    /// API first, the yt-dlp subtitle extraction fallback second.
    pub fn new(join_delimiter: &str) -> Self {
        let mut chain = Self {
            sources: Vec::new(),
            join_delimiter: join_delimiter.to_string(),
        };

        chain.register(Box::new(captions::CaptionApiSource::new()));
        chain.register(Box::new(ytdlp::YtDlpSource::new()));

        chain
    }

    /// Create an empty chain; sources are registered explicitly (tests)
    pub fn with_sources(sources: Vec<Box<dyn TranscriptSource>>, join_delimiter: &str) -> Self {
        Self {
            sources,
            join_delimiter: join_delimiter.to_string(),
        }
    }

    /// Register an additional source at the end of the chain
    pub fn register(&mut self, source: Box<dyn TranscriptSource>) {
        self.sources.push(source);
    }

    /// List source names in fallback order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }

    /// Try each source in order until one yields non-empty text.
    ///
    /// A source error is recorded and the chain moves on; it never
    /// propagates mid-chain. Empty or whitespace-only text falls through
    /// exactly like a failure. After exhaustion the outcome is `Failed`
    /// with the last hard error if any source raised, else `Empty`.
    pub async fn acquire(&self, video: &VideoRef) -> FetchOutcome {
        let mut last_error: Option<anyhow::Error> = None;

        for source in &self.sources {
            tracing::debug!("Trying transcript source: {}", source.source_name());

            match source.fetch_fragments(video).await {
                Ok(fragments) => {
                    let text = join_fragments(&fragments, &self.join_delimiter);
                    if text.is_empty() {
                        tracing::info!(
                            "Source {} returned no text for {}, falling through",
                            source.source_name(),
                            video
                        );
                        continue;
                    }
                    tracing::info!(
                        "Source {} produced {} fragments for {}",
                        source.source_name(),
                        fragments.len(),
                        video
                    );
                    return FetchOutcome::Success(text);
                }
                Err(e) => {
                    tracing::warn!(
                        "Source {} failed for {}: {:#}",
                        source.source_name(),
                        video,
                        e
                    );
                    last_error = Some(e.context(format!(
                        "transcript source '{}' failed",
                        source.source_name()
                    )));
                }
            }
        }

        match last_error {
            Some(e) => FetchOutcome::Failed(e),
            None => FetchOutcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        name: &'static str,
        fragments: Vec<&'static str>,
    }

    #[async_trait]
    impl TranscriptSource for FixedSource {
        async fn fetch_fragments(&self, _video: &VideoRef) -> Result<Vec<TranscriptFragment>> {
            Ok(self
                .fragments
                .iter()
                .map(|t| TranscriptFragment {
                    text: t.to_string(),
                    start_ms: None,
                })
                .collect())
        }

        fn source_name(&self) -> &'static str {
            self.name
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TranscriptSource for FailingSource {
        async fn fetch_fragments(&self, _video: &VideoRef) -> Result<Vec<TranscriptFragment>> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &'static str {
            "failing"
        }
    }

    fn video() -> VideoRef {
        VideoRef::parse("dQw4w9WgXcQ")
    }

    #[tokio::test]
    async fn test_first_source_with_text_wins() {
        let chain = SourceChain::with_sources(
            vec![
                Box::new(FixedSource {
                    name: "primary",
                    fragments: vec!["Hello", "world"],
                }),
                Box::new(FailingSource),
            ],
            " ",
        );

        match chain.acquire(&video()).await {
            FetchOutcome::Success(text) => assert_eq!(text, "Hello world"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_source_falls_through() {
        let chain = SourceChain::with_sources(
            vec![
                Box::new(FixedSource {
                    name: "empty",
                    fragments: vec![],
                }),
                Box::new(FixedSource {
                    name: "whitespace",
                    fragments: vec![" ", "\n"],
                }),
                Box::new(FixedSource {
                    name: "real",
                    fragments: vec!["text"],
                }),
            ],
            " ",
        );

        match chain.acquire(&video()).await {
            FetchOutcome::Success(text) => assert_eq!(text, "text"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_empty_yields_empty_not_success() {
        let chain = SourceChain::with_sources(
            vec![
                Box::new(FixedSource {
                    name: "a",
                    fragments: vec![],
                }),
                Box::new(FixedSource {
                    name: "b",
                    fragments: vec!["  "],
                }),
            ],
            " ",
        );

        assert!(matches!(chain.acquire(&video()).await, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_hard_error_reported_after_exhaustion() {
        let chain = SourceChain::with_sources(
            vec![
                Box::new(FailingSource),
                Box::new(FixedSource {
                    name: "empty",
                    fragments: vec![],
                }),
            ],
            " ",
        );

        match chain.acquire(&video()).await {
            FetchOutcome::Failed(e) => {
                let message = format!("{:#}", e);
                assert!(message.contains("failing"), "cause should name the source");
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_then_success_still_succeeds() {
        let chain = SourceChain::with_sources(
            vec![
                Box::new(FailingSource),
                Box::new(FixedSource {
                    name: "fallback",
                    fragments: vec!["recovered"],
                }),
            ],
            " ",
        );

        match chain.acquire(&video()).await {
            FetchOutcome::Success(text) => assert_eq!(text, "recovered"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_newline_delimiter() {
        let chain = SourceChain::with_sources(
            vec![Box::new(FixedSource {
                name: "fixed",
                fragments: vec!["line one", "line two"],
            })],
            "\n",
        );

        match chain.acquire(&video()).await {
            FetchOutcome::Success(text) => assert_eq!(text, "line one\nline two"),
            other => panic!("expected success, got {:?}", other),
        }
    }
}
