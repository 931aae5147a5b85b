use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::llm::ProviderKind;

// ============= Pattern Types =============

/// Ontology design pattern handled by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Shortcut property inference over an A-p-B-r-C chain.
    Shortcut,
    /// Subclass inference for the range of a property.
    Subclass,
}

impl PatternKind {
    /// Identifier used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Shortcut => "shortcut",
            PatternKind::Subclass => "subclass",
        }
    }

    /// Template directory used when the request does not name one.
    pub fn default_template_dir(&self) -> &'static str {
        match self {
            PatternKind::Shortcut => "1_shortcut",
            PatternKind::Subclass => "2_subclass",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============= API Request/Response Types =============

/// Sampling parameters forwarded to the provider.
///
/// Not every provider consumes every field: the penalties only reach
/// OpenAI-compatible endpoints, `repeat_penalty` only reaches Ollama.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerationParams {
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub frequency_penalty: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,
}

fn default_top_p() -> f32 {
    1.0
}

fn default_repeat_penalty() -> f32 {
    1.1
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: default_top_p(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            repeat_penalty: default_repeat_penalty(),
        }
    }
}

/// A worked example rendered into the few-shot block of a prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FewShotExample {
    #[serde(rename = "A_label")]
    pub a_label: String,
    pub p_label: String,
    #[serde(rename = "B_label")]
    pub b_label: String,
    #[serde(default)]
    pub r_label: Option<String>,
    #[serde(rename = "C_label")]
    pub c_label: String,
    /// Expected answer for the shortcut pattern
    #[serde(rename = "Property", default)]
    pub property: Option<String>,
    /// Expected answer for the subclass pattern
    #[serde(rename = "Subclass", default)]
    pub subclass: Option<String>,
}

/// Request body shared by the generate and prompt-preview endpoints.
///
/// `r_label` is required by the shortcut pattern and ignored by the
/// subclass pattern.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatternRequest {
    #[serde(rename = "A_label")]
    pub a_label: String,
    pub p_label: String,
    #[serde(rename = "B_label")]
    pub b_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_label: Option<String>,
    #[serde(rename = "C_label")]
    pub c_label: String,
    pub use_few_shot: bool,
    #[serde(default)]
    pub few_shot_examples: Vec<FewShotExample>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(flatten)]
    pub params: GenerationParams,
    /// Template directory override (defaults to the pattern's own directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
}

fn default_model_name() -> String {
    "gpt-4o".to_string()
}

impl PatternRequest {
    /// Template directory for this request.
    pub fn template_dir(&self, pattern: PatternKind) -> &str {
        self.pattern_name
            .as_deref()
            .unwrap_or_else(|| pattern.default_template_dir())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShortcutResponse {
    pub property_name: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubclassResponse {
    pub class_name: String,
    pub explanation: String,
}

/// Typed result of a generate call; serializes as the bare pattern response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PatternResponse {
    Shortcut(ShortcutResponse),
    Subclass(SubclassResponse),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromptPreview {
    pub prompt: String,
}

/// Model name to provider mapping exposed to the UI.
pub type ModelProviderMap = std::collections::BTreeMap<String, ProviderKind>;

// ============= Transient Storage Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransientData {
    pub uuid: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct TransientQuery {
    pub uuid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: u16,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unrecognized model: {0}")]
    UnknownModel(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("{provider} API call failed: {message}")]
    Upstream { provider: String, message: String },

    #[error("API did not return valid JSON. Raw output was:\n{raw}")]
    InvalidJson { raw: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

}

impl AppError {
    /// Wrap a provider-side failure with the provider that produced it.
    pub fn upstream(provider: ProviderKind, message: impl std::fmt::Display) -> Self {
        AppError::Upstream {
            provider: provider.display_name().to_string(),
            message: message.to_string(),
        }
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TemplateNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UnknownModel(_) => StatusCode::BAD_REQUEST,
            AppError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::InvalidJson { .. } => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "detail": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request: PatternRequest = serde_json::from_value(json!({
            "A_label": "Person",
            "p_label": "hasAddress",
            "B_label": "Address",
            "C_label": "City",
            "use_few_shot": false
        }))
        .unwrap();

        assert_eq!(request.model_name, "gpt-4o");
        assert_eq!(request.params, GenerationParams::default());
        assert!(request.r_label.is_none());
        assert!(request.few_shot_examples.is_empty());
        assert_eq!(request.template_dir(PatternKind::Subclass), "2_subclass");
    }

    #[test]
    fn test_request_flattened_params() {
        let request: PatternRequest = serde_json::from_value(json!({
            "A_label": "Person",
            "p_label": "hasAddress",
            "B_label": "Address",
            "r_label": "locatedIn",
            "C_label": "City",
            "use_few_shot": true,
            "model_name": "llama-3.3-70b-instruct:q4",
            "temperature": 0.4,
            "top_p": 0.9,
            "repeat_penalty": 1.3,
            "pattern_name": "1_shortcut_v2"
        }))
        .unwrap();

        assert_eq!(request.params.temperature, 0.4);
        assert_eq!(request.params.top_p, 0.9);
        assert_eq!(request.params.repeat_penalty, 1.3);
        assert_eq!(request.params.frequency_penalty, 0.0);
        assert_eq!(request.template_dir(PatternKind::Shortcut), "1_shortcut_v2");
    }

    #[test]
    fn test_few_shot_example_field_names() {
        let example: FewShotExample = serde_json::from_value(json!({
            "A_label": "Person",
            "p_label": "worksFor",
            "B_label": "Company",
            "C_label": "Country",
            "Property": "worksInCountry"
        }))
        .unwrap();

        assert_eq!(example.property.as_deref(), Some("worksInCountry"));
        assert!(example.subclass.is_none());
        assert!(example.r_label.is_none());
    }

    #[test]
    fn test_pattern_response_serializes_untagged() {
        let response = PatternResponse::Subclass(SubclassResponse {
            class_name: "Capital".to_string(),
            explanation: "cities hosting a government".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"class_name": "Capital", "explanation": "cities hosting a government"})
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::UnknownModel("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TemplateNotFound("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::upstream(ProviderKind::Ollama, "boom").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ProviderUnavailable("tgi".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_invalid_json_message_carries_raw_text() {
        let err = AppError::InvalidJson {
            raw: "Sure! The property is hasCity".to_string(),
        };
        assert!(err.to_string().contains("Sure! The property is hasCity"));
    }
}
