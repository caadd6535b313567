use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::summarize::DEFAULT_TRUNCATION_CAP;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini settings
    pub gemini: GeminiConfig,

    /// Google Docs settings
    pub docs: DocsConfig,

    /// Pipeline settings
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model name used for summarization
    pub model: String,

    /// API key; the GEMINI_API_KEY environment variable overrides this at load time
    pub api_key: String,

    /// Character budget for the transcript portion of the prompt
    pub truncation_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// OAuth bearer token; the GOOGLE_DOCS_TOKEN environment variable overrides this
    pub access_token: String,

    /// Target document for append mode
    pub document_id: String,

    /// Whether summaries are appended to the target document or written
    /// into a freshly created one
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Append,
    Create,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Delimiter used when joining caption fragments (" " or "\n")
    pub join_delimiter: String,

    /// Transcript fetch retry attempts
    pub retry_attempts: u32,

    /// Base backoff delay in seconds
    pub retry_base_delay_secs: u64,

    /// Backoff cap in seconds
    pub retry_max_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                model: "gemini-2.5-flash".to_string(),
                api_key: String::new(),
                truncation_cap: DEFAULT_TRUNCATION_CAP,
            },
            docs: DocsConfig {
                access_token: String::new(),
                document_id: String::new(),
                write_mode: WriteMode::Append,
            },
            pipeline: PipelineConfig {
                join_delimiter: " ".to_string(),
                retry_attempts: 3,
                retry_base_delay_secs: 2,
                retry_max_delay_secs: 10,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default.
    ///
    /// Credential environment overrides are applied here, once, so nothing
    /// deeper in the pipeline ever reads the ambient environment.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;
            config
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_key = key;
        }
        if let Ok(token) = std::env::var("GOOGLE_DOCS_TOKEN") {
            config.docs.access_token = token;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("vidsum").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.gemini.model.is_empty() {
            anyhow::bail!("Gemini model must be configured");
        }

        if !matches!(self.pipeline.join_delimiter.as_str(), " " | "\n") {
            anyhow::bail!("join_delimiter must be a single space or a newline");
        }

        if self.pipeline.retry_attempts == 0 {
            anyhow::bail!("retry_attempts must be at least 1");
        }

        Ok(())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs(self.pipeline.retry_base_delay_secs)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_secs(self.pipeline.retry_max_delay_secs)
    }

    /// Display current configuration; credentials are masked
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Gemini Model: {}", self.gemini.model);
        println!(
            "  Gemini API Key: {}",
            if self.gemini.api_key.is_empty() { "(unset)" } else { "(set)" }
        );
        println!("  Prompt Cap: {} chars", self.gemini.truncation_cap);
        println!(
            "  Docs Token: {}",
            if self.docs.access_token.is_empty() { "(unset)" } else { "(set)" }
        );
        println!("  Target Document: {}", self.docs.document_id);
        println!("  Write Mode: {:?}", self.docs.write_mode);
        println!(
            "  Join Delimiter: {}",
            if self.pipeline.join_delimiter == " " { "space" } else { "newline" }
        );
        println!(
            "  Retry: {} attempts, {}s base, {}s cap",
            self.pipeline.retry_attempts,
            self.pipeline.retry_base_delay_secs,
            self.pipeline.retry_max_delay_secs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_bad_delimiter_rejected() {
        let mut config = Config::default();
        config.pipeline.join_delimiter = ", ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_retry_attempts_rejected() {
        let mut config = Config::default();
        config.pipeline.retry_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.gemini.model, config.gemini.model);
        assert_eq!(parsed.docs.write_mode, WriteMode::Append);
        assert_eq!(parsed.pipeline.join_delimiter, " ");
    }
}
