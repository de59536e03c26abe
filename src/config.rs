//! Configuration for an extraction run.
//!
//! Everything the pipeline needs — including the API key — lives in one
//! explicit [`ExtractionConfig`] passed by value into [`crate::extract`].
//! The key is never read from the environment inside the pipeline; the only
//! place that touches `std::env` is [`ExtractionConfig::from_env`], which
//! callers invoke once at startup and which fails fast when the key is
//! missing.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default chat-completion endpoint (OpenRouter).
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Policy for a reply that repeats a line-item label.
///
/// The later occurrence always wins the *values*; the two policies differ
/// only in where the row ends up in the ordered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowOrder {
    /// Re-inserting a duplicate label moves the row to the position of its
    /// last occurrence. (default)
    #[default]
    LastSeen,
    /// A duplicate label keeps the position of its first occurrence.
    FirstSeen,
}

/// Configuration for a single extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::from_env()`].
///
/// # Example
/// ```rust
/// use pdf2income::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .api_key("sk-or-...")
///     .model("mistralai/mistral-7b-instruct")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Bearer token for the model provider. Required.
    pub api_key: String,

    /// Chat-completion endpoint URL. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Model identifier sent in the request body. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Zero keeps the model deterministic and faithful to the source text,
    /// which is exactly what a transcription task wants.
    pub temperature: f32,

    /// Maximum number of extracted-text characters embedded in the prompt.
    /// Default: 12 000.
    ///
    /// Annual reports run to hundreds of pages; the income statement sits in
    /// the opening financial summary often enough that a bounded prefix keeps
    /// prompt cost flat without losing the target section.
    pub prompt_char_limit: usize,

    /// Per-request timeout for the model call in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Retry attempts after the first failed model call. Default: 2.
    ///
    /// The call has no side effects, so retrying is always safe. Set to 0 to
    /// disable retries entirely.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Duplicate-label placement policy. Default: [`RowOrder::LastSeen`].
    pub row_order: RowOrder,

    /// Custom system persona. If None, uses the built-in default from
    /// [`crate::prompts`].
    pub system_prompt: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            prompt_char_limit: 12_000,
            api_timeout_secs: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
            row_order: RowOrder::default(),
            system_prompt: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The key is deliberately redacted from Debug output so configs can
        // be logged safely.
        f.debug_struct("ExtractionConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("prompt_char_limit", &self.prompt_char_limit)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("row_order", &self.row_order)
            .field("system_prompt", &self.system_prompt.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a default config with the API key read from [`API_KEY_ENV`].
    ///
    /// # Errors
    /// [`ExtractError::MissingApiKey`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self, ExtractError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => {
                Ok(Self::builder().api_key(key).build()?)
            }
            _ => Err(ExtractError::MissingApiKey),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn prompt_char_limit(mut self, n: usize) -> Self {
        self.config.prompt_char_limit = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn row_order(mut self, order: RowOrder) -> Self {
        self.config.row_order = order;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(ExtractError::MissingApiKey);
        }
        if c.endpoint.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("endpoint must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("model must not be empty".into()));
        }
        if c.prompt_char_limit == 0 {
            return Err(ExtractError::InvalidConfig(
                "prompt_char_limit must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
