use crate::llm::client::{ProviderClient, ProviderKind};
use crate::types::{AppError, GenerationParams, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Context window requested from Ollama for every call.
pub const DEFAULT_NUM_CTX: u32 = 4096;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: Value,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Ollama client using the native `/api/chat` endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    num_ctx: u32,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            num_ctx: DEFAULT_NUM_CTX,
        }
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    /// `format` value for the request: the schema itself, or plain JSON mode.
    fn format_for(schema: Option<&Value>) -> Value {
        match schema {
            Some(schema) => schema.clone(),
            None => {
                warn!(
                    "No response schema provided for the call to Ollama API. \
                     Defaulting 'format' parameter to generic 'json'"
                );
                Value::String("json".to_string())
            }
        }
    }
}

#[async_trait]
impl ProviderClient for OllamaClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn send(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        schema: Option<&Value>,
    ) -> Result<String> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            format: Self::format_for(schema),
            options: ChatOptions {
                temperature: params.temperature,
                top_p: params.top_p,
                repeat_penalty: params.repeat_penalty,
                num_ctx: self.num_ctx,
            },
        };

        debug!(
            model,
            structured = schema.is_some(),
            prompt_len = prompt.len(),
            "ollama chat request"
        );

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url.trim_end_matches('/')))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::upstream(self.kind(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(
                self.kind(),
                format!("HTTP {}: {}", status, body),
            ));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(self.kind(), format!("Malformed response: {}", e)))?;

        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_falls_back_to_json_mode() {
        assert_eq!(OllamaClient::format_for(None), json!("json"));
    }

    #[test]
    fn test_format_uses_schema() {
        let schema = json!({"type": "object", "required": ["class_name"]});
        assert_eq!(OllamaClient::format_for(Some(&schema)), schema);
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "llama-3.3-70b-instruct:q4",
            messages: vec![ChatMessage {
                role: "user",
                content: "prompt",
            }],
            stream: false,
            format: json!("json"),
            options: ChatOptions {
                temperature: 0.0,
                top_p: 1.0,
                repeat_penalty: 1.1,
                num_ctx: DEFAULT_NUM_CTX,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_ctx"], 4096);
        assert!(value["options"].get("frequency_penalty").is_none());
    }
}
