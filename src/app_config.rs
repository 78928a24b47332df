use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::language_utils;
use crate::sources::SubtitleSource;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Languages to acquire subtitles for (ISO codes)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Subtitle source the candidate URLs are built against
    #[serde(default)]
    pub source: SubtitleSource,

    /// Acquisition settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the fetch and fallback behavior of an acquisition
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AcquisitionConfig {
    /// Relay prefixes tried, in order, after a direct fetch fails.
    /// A prefix ending in a query parameter gets the target URL
    /// percent-encoded; otherwise the target is appended as-is.
    #[serde(default = "default_relays")]
    pub relays: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport attempts per URL; 1 means a single try with no retry
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds between transport retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Whether accepted subtitle payloads are cached in memory for the run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            relays: default_relays(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            cache_enabled: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_relays() -> Vec<String> {
    vec![
        "https://cors.eu.org/".to_string(),
        "https://api.allorigins.win/raw?url=".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    // A failed URL falls through to the relays and the next candidate
    // anyway, so transport retries are off unless asked for
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a JSON file, pretty-printed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(anyhow!("At least one language must be configured"));
        }

        // Validate languages
        for language in &self.languages {
            let _ = language_utils::normalize_to_part1(language)?;
        }

        // Validate relay prefixes
        for relay in &self.acquisition.relays {
            if Url::parse(relay).is_err() {
                return Err(anyhow!("Relay prefix is not a valid URL: {}", relay));
            }
        }

        if self.acquisition.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        if self.acquisition.retry_count == 0 {
            return Err(anyhow!("Retry count must be at least 1 (a single attempt)"));
        }

        Ok(())
    }

    /// Languages normalized to lowercase two-letter form
    pub fn normalized_languages(&self) -> Result<Vec<String>> {
        self.languages
            .iter()
            .map(|code| language_utils::normalize_to_part1(code))
            .collect()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            languages: default_languages(),
            source: SubtitleSource::default(),
            acquisition: AcquisitionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
