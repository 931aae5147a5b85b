//! Provider client abstraction
//!
//! Every upstream chat-completion backend implements [`ProviderClient`]. The
//! backends are a closed set described by [`ProviderKind`]; the
//! [`ProviderRegistry`](super::ProviderRegistry) picks the client for a model
//! by that tag.
//!
//! | Provider | Endpoint | Structured output |
//! |----------|----------|-------------------|
//! | OpenAI | `POST {api_base}/chat/completions` | prompt instructions only |
//! | Ollama | `POST {base_url}/api/chat` | `format` = JSON schema or `"json"` |
//! | TGI | `POST {base_url}/v1/chat/completions` | `response_format` grammar (required) |

use crate::types::{GenerationParams, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upstream backend identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions API
    OpenAI,
    /// Ollama native chat API
    Ollama,
    /// HuggingFace Text Generation Inference (OpenAI-compatible route)
    Tgi,
}

impl ProviderKind {
    /// Identifier used in template paths and the model map.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Tgi => "tgi",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Ollama => "Ollama",
            ProviderKind::Tgi => "Text Generation Inference",
        }
    }

    /// Whether the provider constrains generation with a JSON schema, in
    /// which case the pattern's output schema is loaded for it.
    pub fn accepts_output_schema(&self) -> bool {
        matches!(self, ProviderKind::Ollama | ProviderKind::Tgi)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat-completion backend.
///
/// Implementations send exactly one request per call and return the raw
/// completion text. Transport and API failures must be reported as
/// [`AppError::Upstream`](crate::types::AppError::Upstream) so that no
/// provider-specific error type leaves the client.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// The backend this client talks to
    fn kind(&self) -> ProviderKind;

    /// Send one user message and return the completion text
    async fn send(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        schema: Option<&serde_json::Value>,
    ) -> Result<String>;
}

/// Strip Markdown code-fence artifacts from a completion.
///
/// Models wrap JSON in fences despite instructions (```` ```json ... ``` ````
/// or a single backtick pair). Only the leading fence with its optional
/// `json` language tag and the trailing fence are removed; text inside the
/// payload is never touched.
pub fn clean_completion(raw: &str) -> String {
    let text = strip_language_tag(raw.trim().trim_start_matches('`'));

    text.trim_end_matches(|c: char| c == '`' || c.is_whitespace())
        .trim()
        .to_string()
}

/// Drop a leading `json` tag. A valid JSON document never starts with the
/// bare word, so the tag is only removed when it stands alone.
fn strip_language_tag(text: &str) -> &str {
    let Some(tag) = text.get(..4) else {
        return text;
    };
    if !tag.eq_ignore_ascii_case("json") {
        return text;
    }

    let rest = &text[4..];
    if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[') {
        rest
    } else {
        text
    }
}
