use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidsum",
    about = "vidsum - Summarize YouTube videos with Gemini and save the result to Google Docs",
    version,
    long_about = "A CLI tool that fetches a YouTube transcript through an ordered chain of \
caption sources, condenses it with the Gemini API, and optionally appends the summary to a \
Google Doc."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a video from a URL or bare video ID
    Summarize {
        /// YouTube URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Document title (create mode) or section heading (append mode)
        #[arg(long, value_name = "TITLE", default_value = "YouTube Summary")]
        doc_title: String,

        /// Write the summary to Google Docs
        #[arg(long)]
        save_doc: bool,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Configure Gemini and Google Docs settings
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List transcript sources in fallback order
    Sources,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum ReportFormat {
    /// Plain text
    Text,
    /// JSON report
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}
