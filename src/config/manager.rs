use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::DEFAULT_BATCH_LIMIT;
use crate::error::{API_KEY_ENV, PipelineError};
use crate::translation::{DEFAULT_PROMPT, OPENROUTER_ENDPOINT};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".book2ru.yml";

/// Env file looked up in the working directory.
pub const ENV_FILE_NAME: &str = ".env";

pub const DEFAULT_MODEL: &str = "google/gemini-flash-1.5";
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Contents of `.book2ru.yml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub metadata_footer: Option<bool>,
    pub retry_attempts: Option<u32>,
    pub start_batch: Option<usize>,
    /// Requests per minute.
    pub rate_limits: Option<u32>,
    pub endpoint: Option<String>,
    /// Batch limit in bytes.
    pub batch_size: Option<usize>,
    /// Per-request timeout in seconds.
    pub request_timeout: Option<u64>,
}

/// Fully resolved, immutable settings for one translation run.
#[derive(Clone, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Model identifier sent to the endpoint.
    pub model: String,
    /// Instruction prepended to every batch.
    pub prompt: String,
    /// Print progress diagnostics to stderr.
    pub metadata_footer: bool,
    /// Total attempts per batch, at least 1.
    pub retry_attempts: u32,
    /// 1-based batch to start from.
    pub start_batch: usize,
    pub api_key: String,
    /// Full chat-completions URL.
    pub endpoint: String,
    pub batch_limit_bytes: usize,
    pub request_timeout: Duration,
    /// Requests per minute; `None` disables pacing.
    pub rate_limit: Option<u32>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            metadata_footer: true,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            start_batch: 1,
            api_key: String::new(),
            endpoint: OPENROUTER_ENDPOINT.to_string(),
            batch_limit_bytes: DEFAULT_BATCH_LIMIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rate_limit: None,
        }
    }
}

// The key must never end up in logs.
impl fmt::Debug for TranslateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslateConfig")
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .field("metadata_footer", &self.metadata_footer)
            .field("retry_attempts", &self.retry_attempts)
            .field("start_batch", &self.start_batch)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("endpoint", &self.endpoint)
            .field("batch_limit_bytes", &self.batch_limit_bytes)
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Command-line overrides. They take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub start_batch: Option<usize>,
    pub rate_limits: Option<u32>,
    pub endpoint: Option<String>,
}

/// Merges built-in defaults, the config file and CLI overrides.
///
/// The API key comes from the CLI when given, otherwise from the
/// `OPENROUTER_KEY` environment variable (which a loaded `.env` may have set).
/// An empty key is not rejected here; the driver does that before any work.
///
/// # Errors
///
/// Returns an error if `retry_attempts`, `batch_size` or `request_timeout`
/// is zero.
pub fn resolve_config(options: &ResolveOptions, file: &ConfigFile) -> Result<TranslateConfig> {
    let defaults = TranslateConfig::default();

    let retry_attempts = file.retry_attempts.unwrap_or(defaults.retry_attempts);
    if retry_attempts == 0 {
        return Err(PipelineError::InvalidSetting {
            name: "retry_attempts",
            reason: "must be at least 1".to_string(),
        }
        .into());
    }

    let batch_limit_bytes = file.batch_size.unwrap_or(defaults.batch_limit_bytes);
    if batch_limit_bytes == 0 {
        return Err(PipelineError::InvalidSetting {
            name: "batch_size",
            reason: "must be at least 1 byte".to_string(),
        }
        .into());
    }

    let request_timeout = match file.request_timeout {
        Some(0) => {
            return Err(PipelineError::InvalidSetting {
                name: "request_timeout",
                reason: "must be at least 1 second".to_string(),
            }
            .into());
        }
        Some(secs) => Duration::from_secs(secs),
        None => defaults.request_timeout,
    };

    let api_key = options
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .unwrap_or_default();

    Ok(TranslateConfig {
        model: options
            .model
            .clone()
            .or_else(|| file.model.clone())
            .unwrap_or(defaults.model),
        prompt: file.prompt.clone().unwrap_or(defaults.prompt),
        metadata_footer: file.metadata_footer.unwrap_or(defaults.metadata_footer),
        retry_attempts,
        start_batch: options
            .start_batch
            .or(file.start_batch)
            .unwrap_or(defaults.start_batch),
        api_key,
        endpoint: options
            .endpoint
            .clone()
            .or_else(|| file.endpoint.clone())
            .unwrap_or(defaults.endpoint),
        batch_limit_bytes,
        request_timeout,
        rate_limit: options.rate_limits.or(file.rate_limits),
    })
}

/// Loads the YAML config file and the `.env` file of a run.
pub struct ConfigManager {
    config_path: PathBuf,
    env_path: PathBuf,
    // Set when the path was named explicitly; a missing file is then an error.
    config_required: bool,
}

impl ConfigManager {
    /// Creates a manager looking in the working directory.
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(CONFIG_FILE_NAME),
            env_path: PathBuf::from(ENV_FILE_NAME),
            config_required: false,
        }
    }

    /// Creates a manager looking for `.book2ru.yml` and `.env` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_path: dir.join(CONFIG_FILE_NAME),
            env_path: dir.join(ENV_FILE_NAME),
            config_required: false,
        }
    }

    /// Uses `config_path` instead of `.book2ru.yml`. Unlike the default
    /// location, this file must exist.
    #[must_use]
    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = config_path.into();
        self.config_required = true;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the config file. An empty file, or a missing one at the default
    /// location, yields no overrides.
    pub fn load(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            if self.config_required {
                bail!("Config file not found: {}", self.config_path.display());
            }
            return Ok(ConfigFile::default());
        }

        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        if contents.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yaml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Exports the variables of the env file, if present.
    ///
    /// Variables already set in the process environment are left untouched.
    pub fn load_env(&self) -> Result<()> {
        if !self.env_path.exists() {
            return Ok(());
        }

        dotenvy::from_path(&self.env_path).with_context(|| {
            format!("Failed to load env file: {}", self.env_path.display())
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
