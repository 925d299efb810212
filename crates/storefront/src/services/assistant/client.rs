//! Anthropic Messages API client.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::AssistantConfig;

use super::error::{ApiErrorResponse, AssistantError};
use super::types::{ChatRequest, ChatResponse, Message};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Client for the hosted model. Cheap to clone.
#[derive(Clone)]
pub struct AnthropicClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    model: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Build a client with the key and version headers preset.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError::InvalidApiKey` if the key is not a valid
    /// header value, or `AssistantError::Http` if the HTTP client cannot be built.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| AssistantError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send one request and return the concatenated text of the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error,
    /// or the body cannot be parsed.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let reply = Self::handle_response(response).await?;
        tracing::debug!(
            id = %reply.id,
            output_tokens = reply.usage.output_tokens,
            stop_reason = ?reply.stop_reason,
            "assistant reply received"
        );
        Ok(reply.text())
    }

    async fn handle_response(response: reqwest::Response) -> Result<ChatResponse, AssistantError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AssistantError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AssistantError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return AssistantError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return AssistantError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => AssistantError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                },
                Err(_) => AssistantError::Api {
                    error_type: "unknown".to_string(),
                    message: body,
                },
            },
            Err(e) => AssistantError::Http(e),
        }
    }
}
