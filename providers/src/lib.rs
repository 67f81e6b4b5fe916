//! The generative-text collaborator boundary.
//!
//! # Architecture
//!
//! The engine talks to exactly one external service: a generative-text
//! collaborator. This crate defines that seam and ships the production
//! implementation:
//!
//! - [`TextGenerator`] - The trait the engine is generic over
//! - [`GenerationRequest`] - One instruction dispatch (prompt + system
//!   persona + an opaque stage tag the collaborator may log)
//! - [`ClaudeClient`] - Anthropic Messages API client (non-streaming)
//! - [`retry`] - Bounded retry with exponential backoff
//!
//! # Error Handling
//!
//! Every failure surfaces as a [`GenerateError`]. The engine, not this
//! crate, decides what a failure means for the learner: by contract the
//! staged operations substitute a fixed fallback string and never let an
//! error object cross to the presentation layer.

pub mod retry;

mod claude;
pub use claude::ClaudeClient;

use scribe_types::CognitiveStage;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Canonical Anthropic Messages API endpoint.
pub const CLAUDE_MESSAGES_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Messages API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model for staged guidance calls.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 120;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Shared HTTP client for all collaborator calls.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
                reqwest::Client::new()
            })
    })
}

/// One instruction dispatch toward the collaborator.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Optional system persona sent alongside the instruction.
    pub system: Option<&'a str>,
    /// The composed instruction text.
    pub prompt: &'a str,
    /// Which cognitive stage produced this instruction. Opaque to the
    /// collaborator; carried for its logging and telemetry only.
    pub stage: CognitiveStage,
}

/// Failure of a collaborator call.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API error {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("request failed after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        source: reqwest::Error,
    },
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("malformed response payload: {0}")]
    MalformedResponse(String),
}

/// The seam the engine depends on.
///
/// Implementations dispatch one instruction and resolve to the generated
/// text. Tests substitute a scripted stub; production uses [`ClaudeClient`].
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> impl Future<Output = Result<String, GenerateError>> + Send;
}

#[derive(Debug, Error)]
#[error("API key must not be empty")]
pub struct EmptyApiKeyError;

/// Credentials and sampling knobs for the Claude client.
///
/// ```rust
/// use scribe_providers::ApiConfig;
///
/// let config = ApiConfig::new("sk-ant-test")
///     .unwrap()
///     .with_max_tokens(2048)
///     .with_temperature(0.5);
/// # let _ = config;
/// ```
#[derive(Clone)]
pub struct ApiConfig {
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, EmptyApiKeyError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EmptyApiKeyError);
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error body for diagnostics.
pub(crate) async fn read_capped_error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(mut text) => {
            if text.len() > MAX_ERROR_BODY_BYTES {
                let mut cut = MAX_ERROR_BODY_BYTES;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
                text.push_str("...(truncated)");
            }
            text
        }
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::ApiConfig;

    #[test]
    fn api_config_rejects_empty_key() {
        assert!(ApiConfig::new("").is_err());
        assert!(ApiConfig::new("   ").is_err());
    }

    #[test]
    fn api_config_defaults_match_staged_calls() {
        let config = ApiConfig::new("sk-ant-test").unwrap();
        assert_eq!(config.model(), super::DEFAULT_MODEL);
        assert_eq!(config.max_tokens(), 1024);
        assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn api_config_debug_redacts_key() {
        let config = ApiConfig::new("sk-ant-secret123").unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk-ant-secret123"));
    }
}
