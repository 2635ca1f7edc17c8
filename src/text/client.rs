use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::error::TextModelError;
use super::types::{CompletionRequest, CompletionResponse, Message};

/// Anything that can turn a prompt into generated text.
pub trait TextModel {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, TextModelError>;
}

/// Text model backed by an Anthropic-compatible messages endpoint.
pub struct AnthropicModel {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl AnthropicModel {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, TextModelError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            api_key,
            model,
            client,
            base_url,
        })
    }
}

impl TextModel for AnthropicModel {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, TextModelError> {
        let req = CompletionRequest {
            model: self.model.clone(),
            max_tokens,
            temperature: 0.7,
            messages: vec![Message::user(prompt)],
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(TextModelError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TextModelError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<CompletionResponse>().await?;
        debug!(stop_reason = ?body.stop_reason, "completion received");
        let text = body.text();
        if text.trim().is_empty() {
            return Err(TextModelError::EmptyCompletion);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> AnthropicModel {
        AnthropicModel::new("sk-test".into(), "test-model".into(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn complete_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-api-key", "sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "A bright, airy kitchen."}],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = model_for(&server).complete("prompt", 200).await.unwrap();
        assert_eq!(text, "A bright, airy kitchen.");
    }

    #[tokio::test]
    async fn complete_maps_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let err = model_for(&server).complete("prompt", 200).await.unwrap_err();
        assert!(matches!(
            err,
            TextModelError::RateLimited {
                retry_after_ms: 3000
            }
        ));
    }

    #[tokio::test]
    async fn complete_maps_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .mount(&server)
            .await;

        let err = model_for(&server).complete("prompt", 200).await.unwrap_err();
        match err {
            TextModelError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid x-api-key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"content": [], "stop_reason": "end_turn"})),
            )
            .mount(&server)
            .await;

        let err = model_for(&server).complete("prompt", 200).await.unwrap_err();
        assert!(matches!(err, TextModelError::EmptyCompletion));
    }
}
