use async_trait::async_trait;
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

use super::events::{parse_events, TranscriptFragment};
use super::TranscriptSource;
use crate::video::VideoRef;
use crate::Result;

const DEFAULT_LANGUAGE: &str = "en";

/// Fallback subtitle source using yt-dlp.
///
/// Asks yt-dlp for auto-generated subtitles in json3 format without
/// downloading the video. The subtitle file is written into a per-call
/// temporary directory, so it is removed on every exit path and concurrent
/// acquisitions cannot collide.
pub struct YtDlpSource {
    yt_dlp_path: String,
    language: String,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self::with_command("yt-dlp", DEFAULT_LANGUAGE)
    }

    /// Use a specific yt-dlp executable and subtitle language
    pub fn with_command(yt_dlp_path: &str, language: &str) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.to_string(),
            language: language.to_string(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(output.map(|o| o.status.success()).unwrap_or(false))
    }

    async fn dump_subtitles(&self, video: &VideoRef, dir: &TempDir) -> Result<String> {
        // yt-dlp writes <id>.<lang>.json3 under the output template directory
        let template = dir.path().join("%(id)s.%(ext)s");

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--write-auto-sub",
                "--sub-lang",
                &self.language,
                "--skip-download",
                "--sub-format",
                "json3",
                "--output",
                &template.to_string_lossy(),
                &video.watch_url(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error);
        }

        let subtitle_path = dir
            .path()
            .join(format!("{}.{}.json3", video.as_str(), self.language));

        if !subtitle_path.exists() {
            // yt-dlp exits 0 even when the video has no auto subs
            return Ok(String::new());
        }

        Ok(fs_err::read_to_string(&subtitle_path)?)
    }
}

#[async_trait]
impl TranscriptSource for YtDlpSource {
    async fn fetch_fragments(&self, video: &VideoRef) -> Result<Vec<TranscriptFragment>> {
        if !self.check_availability().await? {
            anyhow::bail!(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
            );
        }

        tracing::debug!("Fetching auto subtitles for {} via yt-dlp", video);

        // Dropping the TempDir deletes the subtitle file on all exit paths
        let dir = TempDir::new()?;
        let raw = self.dump_subtitles(video, &dir).await?;

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_events(&raw)
    }

    fn source_name(&self) -> &'static str {
        "yt-dlp"
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}
