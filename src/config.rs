//! Feed client configuration.
//!
//! Embedders usually build a [`FeedConfig`] in code; `FeedConfig::load`
//! additionally supports an optional TOML file. A missing or empty file
//! yields `FeedConfig::default()`. Unknown keys are silently ignored by
//! serde, though we log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Feed client configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `api_token` to prevent secret leakage in
/// logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the article backend.
    pub base_url: String,

    /// Bearer token attached to every request when present.
    pub api_token: Option<String>,

    /// Page size for the very first page of any category. A smaller
    /// first page keeps initial latency down.
    pub initial_page_size: u32,

    /// Page size for subsequent "load more" pages.
    pub page_size: u32,

    /// Delay before a blocking loading indicator may appear, in
    /// milliseconds. Fetches that settle faster never show a spinner.
    pub loader_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_token: None,
            initial_page_size: 5,
            page_size: 10,
            loader_delay_ms: 300,
        }
    }
}

/// Mask api_token in Debug output to prevent secret leakage.
impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("initial_page_size", &self.initial_page_size)
            .field("page_size", &self.page_size)
            .field("loader_delay_ms", &self.loader_delay_ms)
            .finish()
    }
}

impl FeedConfig {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(FeedConfig::default())`
    /// - Empty file → `Ok(FeedConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    ///
    /// Page sizes of zero are clamped back to their defaults; the
    /// pagination contract assumes at least one article per page.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted
        // or maliciously large config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {} // Size is within limits, proceed
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "base_url",
                "api_token",
                "initial_page_size",
                "page_size",
                "loader_delay_ms",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: FeedConfig = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config.normalized())
    }

    /// Clamp degenerate values back to defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.initial_page_size == 0 {
            tracing::warn!("initial_page_size of 0 clamped to default");
            self.initial_page_size = defaults.initial_page_size;
        }
        if self.page_size == 0 {
            tracing::warn!("page_size of 0 clamped to default");
            self.page_size = defaults.page_size;
        }
        self
    }

    /// The loading-indicator debounce as a `Duration`.
    pub fn loader_delay(&self) -> Duration {
        Duration::from_millis(self.loader_delay_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
