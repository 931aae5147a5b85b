use crate::llm::client::{ProviderClient, ProviderKind};
use crate::types::{AppError, GenerationParams, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Models that only accept the default sampling temperature.
pub const DEFAULT_REASONING_MODELS: &[&str] = &["o1-preview", "o1-mini"];

// ============= OpenAI-compatible wire types =============
// Shared with the TGI client, which serves the same chat completions route.

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// POST a chat completion request and return the first choice's content.
pub(crate) async fn create_chat_completion(
    http: &reqwest::Client,
    kind: ProviderKind,
    url: &str,
    api_key: Option<&str>,
    request: &ChatCompletionRequest<'_>,
) -> Result<String> {
    let mut builder = http.post(url).json(request);
    if let Some(key) = api_key {
        builder = builder.bearer_auth(key);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| AppError::upstream(kind, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::upstream(kind, format!("HTTP {}: {}", status, body)));
    }

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| AppError::upstream(kind, format!("Malformed response: {}", e)))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::upstream(kind, "No response content"))
}

/// OpenAI chat completions client.
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    reasoning_models: Vec<String>,
}

impl OpenAIClient {
    /// Create a client. A missing key is tolerated here and reported on the
    /// first call so the rest of the service can still start.
    pub fn new(api_key: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            api_base: api_base.into(),
            reasoning_models: DEFAULT_REASONING_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    /// Replace the list of models whose temperature is pinned to 1.0
    pub fn with_reasoning_models(mut self, models: Vec<String>) -> Self {
        self.reasoning_models = models;
        self
    }

    fn is_reasoning_model(&self, model: &str) -> bool {
        self.reasoning_models.iter().any(|m| m == model)
    }

    /// Temperature actually sent for `model`.
    pub fn effective_temperature(&self, model: &str, requested: f32) -> f32 {
        if self.is_reasoning_model(model) {
            1.0
        } else {
            requested
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAIClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    async fn send(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        _schema: Option<&serde_json::Value>,
    ) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Missing OPENAI_API_KEY.".to_string()))?;

        let request = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.effective_temperature(model, params.temperature),
            top_p: params.top_p,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
            max_tokens: None,
            response_format: None,
        };

        debug!(
            model,
            temperature = request.temperature,
            prompt_len = prompt.len(),
            "openai chat completion request"
        );

        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        create_chat_completion(&self.http, self.kind(), &url, Some(api_key), &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_models_pin_temperature() {
        let client = OpenAIClient::new(Some("sk-test".into()), "https://api.openai.com/v1");
        assert_eq!(client.effective_temperature("o1-mini", 0.2), 1.0);
        assert_eq!(client.effective_temperature("gpt-4o", 0.2), 0.2);
    }

    #[test]
    fn test_custom_reasoning_models() {
        let client = OpenAIClient::new(None, "http://localhost")
            .with_reasoning_models(vec!["o3-mini-2025-01-31".to_string()]);
        assert_eq!(client.effective_temperature("o3-mini-2025-01-31", 0.0), 1.0);
        assert_eq!(client.effective_temperature("o1-mini", 0.0), 0.0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let client = OpenAIClient::new(Some(String::new()), "http://127.0.0.1:9");
        let err = client
            .send("gpt-4o", "prompt", &GenerationParams::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_request_serialization_skips_unused_fields() {
        let request = ChatCompletionRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage::user("hi")],
            temperature: 0.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: None,
            response_format: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("response_format").is_none());
    }
}
