//! Anthropic Messages API client (non-streaming).
//!
//! One staged guidance call is one `POST /v1/messages` with a single user
//! message; the generated text comes back in `content[0].text`. No tool
//! use, no streaming.

use crate::{
    ANTHROPIC_VERSION, ApiConfig, CLAUDE_MESSAGES_API_URL, GenerateError, GenerationRequest,
    TextGenerator, http_client, read_capped_error_body,
    retry::{RetryConfig, RetryOutcome, send_with_retry},
};
use serde_json::json;

/// Production [`TextGenerator`] backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    config: ApiConfig,
    base_url: String,
    retry: RetryConfig,
}

impl ClaudeClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            base_url: CLAUDE_MESSAGES_API_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Point the client at a different endpoint. Tests use this to target a
    /// local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn build_request_body(config: &ApiConfig, request: &GenerationRequest<'_>) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("model".into(), json!(config.model()));
    body.insert("max_tokens".into(), json!(config.max_tokens()));
    body.insert("temperature".into(), json!(config.temperature()));
    body.insert(
        "messages".into(),
        json!([{ "role": "user", "content": request.prompt }]),
    );

    if let Some(system) = request.system {
        if !system.trim().is_empty() {
            body.insert("system".into(), json!(system));
        }
    }

    serde_json::Value::Object(body)
}

fn extract_content(payload: &serde_json::Value) -> Result<String, GenerateError> {
    payload
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            GenerateError::MalformedResponse("missing content[0].text in response".to_string())
        })
}

impl TextGenerator for ClaudeClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerateError> {
        let body = build_request_body(&self.config, &request);

        tracing::debug!(
            stage = request.stage.as_str(),
            model = self.config.model(),
            prompt_chars = request.prompt.chars().count(),
            "Dispatching instruction to collaborator"
        );

        let outcome = send_with_retry(
            || {
                http_client()
                    .post(&self.base_url)
                    .header("x-api-key", self.config.api_key())
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
            },
            &self.retry,
        )
        .await;

        match outcome {
            RetryOutcome::Success(response) => {
                let payload: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;
                extract_content(&payload)
            }
            RetryOutcome::HttpError(response) => {
                let status = response.status();
                let body = read_capped_error_body(response).await;
                Err(GenerateError::Http { status, body })
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                Err(GenerateError::Connection { attempts, source })
            }
            RetryOutcome::NonRetryable(e) => Err(GenerateError::Transport(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_request_body, extract_content};
    use crate::{ApiConfig, GenerationRequest};
    use scribe_types::CognitiveStage;
    use serde_json::json;

    fn test_request(prompt: &'static str) -> GenerationRequest<'static> {
        GenerationRequest {
            system: Some("你是写作导师"),
            prompt,
            stage: CognitiveStage::Spark,
        }
    }

    #[test]
    fn body_carries_model_and_sampling_knobs() {
        let config = ApiConfig::new("sk-ant-test").unwrap();
        let body = build_request_body(&config, &test_request("写作引导"));
        assert_eq!(body["model"], crate::DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "写作引导");
        assert_eq!(body["system"], "你是写作导师");
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let config = ApiConfig::new("sk-ant-test").unwrap();
        let request = GenerationRequest {
            system: Some("   "),
            prompt: "p",
            stage: CognitiveStage::Refine,
        };
        let body = build_request_body(&config, &request);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn extract_content_reads_first_text_block() {
        let payload = json!({
            "content": [{ "type": "text", "text": "生成的引导" }]
        });
        assert_eq!(extract_content(&payload).unwrap(), "生成的引导");
    }

    #[test]
    fn extract_content_rejects_missing_block() {
        assert!(extract_content(&json!({ "content": [] })).is_err());
        assert!(extract_content(&json!({})).is_err());
        assert!(extract_content(&json!({ "content": [{ "type": "text" }] })).is_err());
    }
}

#[cfg(test)]
mod integration_tests {
    use super::ClaudeClient;
    use crate::retry::RetryConfig;
    use crate::{ApiConfig, GenerateError, GenerationRequest, TextGenerator};
    use scribe_types::CognitiveStage;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ClaudeClient {
        let config = ApiConfig::new("sk-ant-test").unwrap();
        ClaudeClient::new(config)
            .with_base_url(format!("{}/v1/messages", server.uri()))
            .with_retry(RetryConfig {
                max_attempts: 2,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
                jitter_factor: 0.0,
            })
    }

    fn spark_request() -> GenerationRequest<'static> {
        GenerationRequest {
            system: None,
            prompt: "【启发式引导阶段】",
            stage: CognitiveStage::Spark,
        }
    }

    #[tokio::test]
    async fn success_returns_generated_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(body_partial_json(
                json!({ "messages": [{ "role": "user", "content": "【启发式引导阶段】" }] }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "不妨从那个眼神写起。" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let content = client.generate(spark_request()).await.unwrap();
        assert_eq!(content, "不妨从那个眼神写起。");
    }

    #[tokio::test]
    async fn server_error_is_retried_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "第二次成功" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let content = client.generate(spark_request()).await.unwrap();
        assert_eq!(content, "第二次成功");
    }

    #[tokio::test]
    async fn http_error_surfaces_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate(spark_request()).await.unwrap_err();
        match err {
            GenerateError::Http { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid x-api-key"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.generate(spark_request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::MalformedResponse(_)));
    }
}
