use crate::llm::ProviderKind;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Prompt technique selected by the few-shot flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    Baseline,
    FewShot,
}

impl Technique {
    pub fn from_flag(use_few_shot: bool) -> Self {
        if use_few_shot {
            Technique::FewShot
        } else {
            Technique::Baseline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::Baseline => "baseline",
            Technique::FewShot => "few_shot",
        }
    }
}

/// Read-only source of prompt templates and output schemas.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Template text for `(pattern, provider, technique)`.
    async fn read_template(
        &self,
        pattern_dir: &str,
        provider: ProviderKind,
        technique: Technique,
    ) -> std::io::Result<String>;

    /// Output schema JSON text for a pattern.
    async fn read_schema(&self, pattern_dir: &str) -> std::io::Result<String>;
}

/// Prompt store backed by a directory tree:
///
/// ```text
/// {root}/{pattern}/{provider}/{baseline|few_shot}.txt
/// {root}/{pattern}/output_schema.json
/// ```
pub struct FsPromptStore {
    root: PathBuf,
}

impl FsPromptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn template_path(
        &self,
        pattern_dir: &str,
        provider: ProviderKind,
        technique: Technique,
    ) -> PathBuf {
        self.root
            .join(pattern_dir)
            .join(provider.as_str())
            .join(format!("{}.txt", technique.as_str()))
    }

    pub fn schema_path(&self, pattern_dir: &str) -> PathBuf {
        self.root.join(pattern_dir).join("output_schema.json")
    }
}

#[async_trait]
impl PromptStore for FsPromptStore {
    async fn read_template(
        &self,
        pattern_dir: &str,
        provider: ProviderKind,
        technique: Technique,
    ) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.template_path(pattern_dir, provider, technique)).await
    }

    async fn read_schema(&self, pattern_dir: &str) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.schema_path(pattern_dir)).await
    }
}

/// Template text plus the output schema, when the provider takes one.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub text: String,
    pub schema: Option<Value>,
}

/// Looks up the template and schema for a request.
pub struct TemplateResolver {
    store: Box<dyn PromptStore>,
}

impl TemplateResolver {
    pub fn new(store: impl PromptStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Resolve the template for `(pattern_dir, provider, technique)`.
    ///
    /// A missing, unreadable or empty template fails the request. A schema
    /// that cannot be read or parsed is logged and dropped.
    pub async fn resolve(
        &self,
        pattern_dir: &str,
        provider: ProviderKind,
        use_few_shot: bool,
    ) -> Result<ResolvedTemplate> {
        let technique = Technique::from_flag(use_few_shot);

        let text = match self
            .store
            .read_template(pattern_dir, provider, technique)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                return Err(AppError::TemplateNotFound(format!(
                    "{}/{}/{} is empty",
                    pattern_dir,
                    provider,
                    technique.as_str()
                )))
            }
            Err(e) => {
                return Err(AppError::TemplateNotFound(format!(
                    "{}/{}/{} ({})",
                    pattern_dir,
                    provider,
                    technique.as_str(),
                    e
                )))
            }
        };

        let schema = if provider.accepts_output_schema() {
            self.load_schema(pattern_dir).await
        } else {
            None
        };

        debug!(
            pattern = pattern_dir,
            provider = %provider,
            technique = technique.as_str(),
            has_schema = schema.is_some(),
            "Resolved prompt template"
        );

        Ok(ResolvedTemplate { text, schema })
    }

    async fn load_schema(&self, pattern_dir: &str) -> Option<Value> {
        let raw = match self.store.read_schema(pattern_dir).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(pattern = pattern_dir, error = %e, "Output schema not readable");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(schema @ Value::Object(_)) => Some(schema),
            Ok(other) => {
                warn!(
                    pattern = pattern_dir,
                    found = json_kind(&other),
                    "Output schema is not a JSON object"
                );
                None
            }
            Err(e) => {
                warn!(pattern = pattern_dir, error = %e, "Output schema is not valid JSON");
                None
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
