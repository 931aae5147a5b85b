//! HuggingFace Text Generation Inference client
//!
//! TGI serves an OpenAI-compatible chat route, so the request shape is shared
//! with [`super::openai`]. It differs in three ways: the model name is always
//! `tgi`, `top_p` must lie strictly inside (0, 1), and the output grammar is
//! mandatory.

use crate::llm::client::{ProviderClient, ProviderKind};
use crate::llm::openai::{create_chat_completion, ChatCompletionRequest, ChatMessage};
use crate::types::{AppError, GenerationParams, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Completion length cap sent with every TGI request.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// TGI rejects a temperature of exactly zero.
const FALLBACK_TEMPERATURE: f32 = 0.7;

pub struct TgiClient {
    http: reqwest::Client,
    base_url: String,
    max_tokens: u32,
}

impl TgiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check that the endpoint answers `GET /info`.
    ///
    /// Called once at startup; the client is only registered when this
    /// returns `true`.
    pub async fn probe(&self) -> bool {
        let url = format!("{}/info", self.base());
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let info: Value = response.json().await.unwrap_or(Value::Null);
                let model_id = info
                    .get("model_id")
                    .and_then(|id| id.as_str())
                    .unwrap_or("unknown");
                info!(
                    url = %url,
                    model_id,
                    "Connected to Text Generation Inference API"
                );
                true
            }
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "Can't connect to Text Generation Inference API");
                false
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Can't connect to Text Generation Inference API");
                false
            }
        }
    }
}

/// Clamp `top_p` into the range TGI accepts.
pub fn clamp_top_p(top_p: f32) -> f32 {
    top_p.clamp(0.01, 0.99)
}

/// A null or empty grammar constrains nothing, so TGI treats it as absent.
fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl ProviderClient for TgiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Tgi
    }

    async fn send(
        &self,
        _model: &str,
        prompt: &str,
        params: &GenerationParams,
        schema: Option<&Value>,
    ) -> Result<String> {
        let schema = schema.filter(|s| !is_empty_schema(s)).ok_or_else(|| {
            AppError::Configuration(
                "Missing response type for Text Generation Inference API Call.".to_string(),
            )
        })?;

        let temperature = if params.temperature == 0.0 {
            FALLBACK_TEMPERATURE
        } else {
            params.temperature
        };

        let request = ChatCompletionRequest {
            model: "tgi",
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            top_p: clamp_top_p(params.top_p),
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
            max_tokens: Some(self.max_tokens),
            response_format: Some(json!({
                "type": "json_object",
                "value": schema,
            })),
        };

        debug!(
            temperature,
            top_p = request.top_p,
            prompt_len = prompt.len(),
            "tgi chat completion request"
        );

        let url = format!("{}/v1/chat/completions", self.base());
        create_chat_completion(&self.http, self.kind(), &url, None, &request).await
    }
}
