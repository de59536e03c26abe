//! The chat-completion call.
//!
//! Intentionally thin: prompt text comes from [`crate::prompts`], the
//! request/response contract is fixed (OpenAI-style chat completions), and
//! everything else here is transport concerns — explicit timeout, error
//! classification, and bounded retry.
//!
//! ## Retry Strategy
//!
//! The call is idempotent (no server-side effects), so transient failures —
//! network errors, timeouts, HTTP 429/5xx — are retried with exponential
//! backoff (`retry_backoff_ms * 2^attempt`). Permanent failures (401, 400,
//! a malformed reply body) surface immediately; retrying those only burns
//! time and quota.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Successful completion plus the retry count that was needed to get it.
#[derive(Debug)]
pub struct Completion {
    pub content: String,
    pub retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// HTTP client for the model provider, configured once per run.
pub struct ModelClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl ModelClient {
    /// Build a client from the run configuration.
    ///
    /// The per-request timeout is set on the underlying `reqwest::Client`;
    /// without it a stalled endpoint would hang the whole run indefinitely.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ExtractError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.api_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// POST the system/user message pair and return the top completion text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<Completion, ExtractError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
        };

        let mut last_err: Option<ExtractError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms * 2u64.pow(attempt - 1);
                warn!(
                    "model call: retry {}/{} after {}ms",
                    attempt, self.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            let start = Instant::now();
            match self.try_once(&body).await {
                Ok(content) => {
                    debug!(
                        "model call succeeded in {}ms ({} chars)",
                        start.elapsed().as_millis(),
                        content.len()
                    );
                    return Ok(Completion {
                        content,
                        retries: attempt,
                    });
                }
                Err(e) if is_retryable(&e) => {
                    warn!("model call attempt {} failed: {}", attempt + 1, e);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| ExtractError::Internal("no attempt made".into())))
    }

    async fn try_once(&self, body: &ChatRequest<'_>) -> Result<String, ExtractError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_request_error(e, self.timeout_secs))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_request_error(e, self.timeout_secs))?;

        if !status.is_success() {
            return Err(ExtractError::ApiStatus {
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        parse_completion(&text)
    }
}

/// Map a reqwest error to the matching transport variant.
fn classify_request_error(e: reqwest::Error, timeout_secs: u64) -> ExtractError {
    if e.is_timeout() {
        ExtractError::ApiTimeout { secs: timeout_secs }
    } else {
        ExtractError::Network { detail: e.to_string() }
    }
}

/// Extract `choices[0].message.content` from a response body.
fn parse_completion(body: &str) -> Result<String, ExtractError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ExtractError::MalformedReply {
            detail: format!("not valid completion JSON ({e}): {}", snippet(body)),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ExtractError::MalformedReply {
            detail: "response contained no choices".into(),
        })
}

/// Transient failures worth retrying: connectivity, timeouts, 429 and 5xx.
fn is_retryable(e: &ExtractError) -> bool {
    match e {
        ExtractError::Network { .. } | ExtractError::ApiTimeout { .. } => true,
        ExtractError::ApiStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// First 200 chars of a body, for error messages and logs.
fn snippet(body: &str) -> String {
    let mut s: String = body.chars().take(200).collect();
    if s.len() < body.len() {
        s.push('…');
    }
    s
}
