use serde::Serialize;

use crate::config::{Config, WriteMode};
use crate::docs::{DocumentStore, GoogleDocsStore};
use crate::retry::RetryPolicy;
use crate::summarize::{GeminiSummarizer, Summarizer};
use crate::transcript::{FetchOutcome, SourceChain};
use crate::video::{validate_input, VideoRef};
use crate::{PipelineError, Result};

/// Per-invocation caller options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Section heading (append mode) or document title (create mode)
    pub doc_title: String,

    /// Whether the summary is persisted at all
    pub create_doc: bool,
}

/// Terminal state of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Success,
    TranscriptFailure,
    SummarizationFailure,
    PersistenceFailure,
}

/// Result of one pipeline invocation.
///
/// Created once per run and never mutated afterwards. Failure of a late
/// stage keeps whatever earlier stages produced: a persistence failure
/// still carries the computed summary.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub status: PipelineStatus,

    /// Human-readable status line, always present
    pub message: String,

    /// Summary text, when summarization completed
    pub summary: Option<String>,

    /// Document URL, when persistence completed
    pub doc_url: Option<String>,
}

impl PipelineReport {
    fn failed(status: PipelineStatus, error: &PipelineError) -> Self {
        Self {
            status,
            message: error.to_string(),
            summary: None,
            doc_url: None,
        }
    }
}

/// Sequences validate -> fetch -> summarize -> persist.
///
/// Constructed fresh per process; holds no mutable state, so concurrent
/// runs over a shared instance are independent. Only the fetch stage is
/// retried.
pub struct SummaryPipeline {
    chain: SourceChain,
    summarizer: Box<dyn Summarizer>,
    store: Box<dyn DocumentStore>,
    retry: RetryPolicy,
    write_mode: WriteMode,
}

impl SummaryPipeline {
    /// Build a pipeline with the real collaborators from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            chain: SourceChain::new(&config.pipeline.join_delimiter),
            summarizer: Box::new(GeminiSummarizer::new(
                &config.gemini.model,
                &config.gemini.api_key,
                config.gemini.truncation_cap,
            )),
            store: Box::new(GoogleDocsStore::new(
                &config.docs.access_token,
                &config.docs.document_id,
            )),
            retry: RetryPolicy::new(
                config.pipeline.retry_attempts,
                config.retry_base_delay(),
                config.retry_max_delay(),
            ),
            write_mode: config.docs.write_mode,
        }
    }

    /// Build a pipeline with injected collaborators (tests, embedding)
    pub fn with_collaborators(
        chain: SourceChain,
        summarizer: Box<dyn Summarizer>,
        store: Box<dyn DocumentStore>,
        retry: RetryPolicy,
        write_mode: WriteMode,
    ) -> Self {
        Self {
            chain,
            summarizer,
            store,
            retry,
            write_mode,
        }
    }

    /// Transcript sources in fallback order, for display
    pub fn source_names(&self) -> Vec<&'static str> {
        self.chain.source_names()
    }

    /// Run the full pipeline for one video.
    ///
    /// Never returns an error: every failure path is folded into the
    /// report with a classified, human-readable message.
    pub async fn run(&self, raw_input: &str, options: &RunOptions) -> PipelineReport {
        if !validate_input(raw_input) {
            let error = PipelineError::InvalidInput(raw_input.trim().to_string());
            tracing::warn!("{}", error);
            return PipelineReport::failed(PipelineStatus::TranscriptFailure, &error);
        }

        let video = VideoRef::parse(raw_input);
        tracing::info!("Starting pipeline for video {}", video);

        let transcript = match self.fetch_with_retry(&video).await {
            Ok(text) => text,
            Err(e) => {
                let error = PipelineError::TranscriptUnavailable(e);
                tracing::error!("{:#}", error);
                return PipelineReport::failed(PipelineStatus::TranscriptFailure, &error);
            }
        };

        tracing::info!("Fetched transcript ({} chars), summarizing", transcript.len());

        let summary = match self.summarizer.summarize(&transcript).await {
            Ok(text) => text,
            Err(e) => {
                let error = PipelineError::Summarization(e);
                tracing::error!("{:#}", error);
                return PipelineReport::failed(PipelineStatus::SummarizationFailure, &error);
            }
        };

        if !options.create_doc {
            return PipelineReport {
                status: PipelineStatus::Success,
                message: "Success".to_string(),
                summary: Some(summary),
                doc_url: None,
            };
        }

        match self.persist(&options.doc_title, &summary).await {
            Ok(doc_url) => PipelineReport {
                status: PipelineStatus::Success,
                message: "Success".to_string(),
                summary: Some(summary),
                doc_url: Some(doc_url),
            },
            Err(e) => {
                // Partial success: the summary survives a failed write
                let error = PipelineError::Persistence(e);
                tracing::error!("{:#}", error);
                PipelineReport {
                    status: PipelineStatus::PersistenceFailure,
                    message: format!("Summary created but not saved: {}", error),
                    summary: Some(summary),
                    doc_url: None,
                }
            }
        }
    }

    /// Retry-wrapped acquisition; `Empty` is converted to an error so a
    /// transient empty caption response is retried like a hard failure
    async fn fetch_with_retry(&self, video: &VideoRef) -> Result<String> {
        self.retry.run(|| self.fetch_once(video)).await
    }

    async fn fetch_once(&self, video: &VideoRef) -> Result<String> {
        match self.chain.acquire(video).await {
            FetchOutcome::Success(text) => Ok(text),
            FetchOutcome::Empty => {
                anyhow::bail!("no transcript source produced any text for {}", video)
            }
            FetchOutcome::Failed(e) => Err(e),
        }
    }

    async fn persist(&self, title: &str, summary: &str) -> Result<String> {
        match self.write_mode {
            WriteMode::Append => self.store.append(title, summary).await,
            WriteMode::Create => self.store.create(title, summary).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{TranscriptFragment, TranscriptSource};
    use async_trait::async_trait;
    use mockall::mock;
    use std::time::Duration;

    mock! {
        Summ {}

        #[async_trait]
        impl Summarizer for Summ {
            async fn summarize(&self, transcript: &str) -> Result<String>;
        }
    }

    struct TextSource;

    #[async_trait]
    impl TranscriptSource for TextSource {
        async fn fetch_fragments(&self, _video: &VideoRef) -> Result<Vec<TranscriptFragment>> {
            Ok(vec![TranscriptFragment {
                text: "some captions".to_string(),
                start_ms: None,
            }])
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    struct NoopSummarizer;

    #[async_trait]
    impl Summarizer for NoopSummarizer {
        async fn summarize(&self, transcript: &str) -> Result<String> {
            Ok(format!("summary of {} chars", transcript.len()))
        }
    }

    struct NoopStore;

    #[async_trait]
    impl DocumentStore for NoopStore {
        async fn append(&self, _heading: &str, _text: &str) -> Result<String> {
            Ok("https://docs.example/doc".to_string())
        }

        async fn create(&self, _title: &str, _text: &str) -> Result<String> {
            Ok("https://docs.example/doc".to_string())
        }
    }

    fn pipeline_with_empty_chain() -> SummaryPipeline {
        SummaryPipeline::with_collaborators(
            SourceChain::with_sources(Vec::new(), " "),
            Box::new(NoopSummarizer),
            Box::new(NoopStore),
            RetryPolicy::new(1, Duration::ZERO, Duration::ZERO),
            WriteMode::Append,
        )
    }

    #[tokio::test]
    async fn test_invalid_input_short_circuits() {
        let pipeline = pipeline_with_empty_chain();
        let report = pipeline
            .run(
                "definitely not a video",
                &RunOptions {
                    doc_title: "t".to_string(),
                    create_doc: true,
                },
            )
            .await;

        assert_eq!(report.status, PipelineStatus::TranscriptFailure);
        assert!(report.message.contains("Invalid video URL or ID"));
        assert!(report.summary.is_none());
        assert!(report.doc_url.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_transcript_failure() {
        let pipeline = pipeline_with_empty_chain();
        let report = pipeline
            .run(
                "dQw4w9WgXcQ",
                &RunOptions {
                    doc_title: "t".to_string(),
                    create_doc: false,
                },
            )
            .await;

        assert_eq!(report.status, PipelineStatus::TranscriptFailure);
        assert!(report.message.contains("Transcript unavailable"));
    }

    #[tokio::test]
    async fn test_summarizer_receives_joined_transcript() {
        let mut summarizer = MockSumm::new();
        summarizer
            .expect_summarize()
            .withf(|transcript: &str| transcript == "some captions")
            .times(1)
            .returning(|_| Ok("mocked summary".to_string()));

        let pipeline = SummaryPipeline::with_collaborators(
            SourceChain::with_sources(vec![Box::new(TextSource)], " "),
            Box::new(summarizer),
            Box::new(NoopStore),
            RetryPolicy::new(1, Duration::ZERO, Duration::ZERO),
            WriteMode::Append,
        );

        let report = pipeline
            .run(
                "dQw4w9WgXcQ",
                &RunOptions {
                    doc_title: "t".to_string(),
                    create_doc: false,
                },
            )
            .await;

        assert_eq!(report.status, PipelineStatus::Success);
        assert_eq!(report.summary.as_deref(), Some("mocked summary"));
    }
}
