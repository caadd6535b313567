//! vidsum - A Rust CLI tool for summarizing YouTube videos
//!
//! This library fetches a video transcript through an ordered chain of caption
//! sources, condenses it with the Gemini API, and optionally appends the
//! summary to a Google Doc.

pub mod cli;
pub mod config;
pub mod docs;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod summarize;
pub mod transcript;
pub mod utils;
pub mod video;

pub use cli::{Cli, Commands, ReportFormat};
pub use config::Config;
pub use pipeline::{PipelineReport, PipelineStatus, RunOptions, SummaryPipeline};
pub use transcript::{FetchOutcome, SourceChain, TranscriptSource};
pub use video::VideoRef;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Classified pipeline errors; each stage wraps its collaborator's failure
/// into exactly one of these before it crosses a stage boundary.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("Invalid video URL or ID: {0}")]
    InvalidInput(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(#[source] anyhow::Error),

    #[error("Summarization failed: {0}")]
    Summarization(#[source] anyhow::Error),

    #[error("Document write failed: {0}")]
    Persistence(#[source] anyhow::Error),
}
