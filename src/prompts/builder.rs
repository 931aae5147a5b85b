use crate::llm::{ProviderKind, ProviderRegistry};
use crate::prompts::resolver::TemplateResolver;
use crate::prompts::template::safe_substitute;
use crate::types::{AppError, FewShotExample, PatternKind, PatternRequest, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A rendered prompt together with what is needed to send it.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub text: String,
    pub provider: ProviderKind,
    pub schema: Option<Value>,
}

/// Renders pattern requests into provider-ready prompts.
pub struct PromptBuilder {
    registry: Arc<ProviderRegistry>,
    resolver: TemplateResolver,
}

impl PromptBuilder {
    pub fn new(registry: Arc<ProviderRegistry>, resolver: TemplateResolver) -> Self {
        Self { registry, resolver }
    }

    /// Build the prompt for `request` under `pattern`.
    ///
    /// The model is routed and the request validated before any template is
    /// read.
    pub async fn build(&self, pattern: PatternKind, request: &PatternRequest) -> Result<BuiltPrompt> {
        let provider = self.registry.route(&request.model_name)?;

        if pattern == PatternKind::Shortcut && request.r_label.is_none() {
            return Err(AppError::InvalidInput(
                "r_label is required for the shortcut pattern".to_string(),
            ));
        }

        let pattern_dir = request.template_dir(pattern);
        validate_template_dir(pattern_dir)?;

        let resolved = self
            .resolver
            .resolve(pattern_dir, provider, request.use_few_shot)
            .await?;

        let few_shot = if request.use_few_shot {
            render_few_shot(pattern, &request.few_shot_examples)
        } else {
            String::new()
        };

        let output_schema = match &resolved.schema {
            Some(schema) => schema.to_string(),
            None => "null".to_string(),
        };

        let mut values: HashMap<&str, String> = HashMap::from([
            ("few_shot_examples", few_shot),
            ("A_label", request.a_label.clone()),
            ("p_label", request.p_label.clone()),
            ("B_label", request.b_label.clone()),
            ("C_label", request.c_label.clone()),
            ("output_schema", output_schema),
        ]);
        if pattern == PatternKind::Shortcut {
            if let Some(r_label) = &request.r_label {
                values.insert("r_label", r_label.clone());
            }
        }

        Ok(BuiltPrompt {
            text: safe_substitute(&resolved.text, &values),
            provider,
            schema: resolved.schema,
        })
    }
}

/// Template directories are single path segments.
fn validate_template_dir(dir: &str) -> Result<()> {
    let valid = !dir.is_empty()
        && dir != "."
        && dir != ".."
        && !dir.contains(['/', '\\'])
        && !dir.contains('\0');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Invalid pattern_name: {:?}",
            dir
        )))
    }
}

/// Render the few-shot block; empty when there are no examples.
pub fn render_few_shot(pattern: PatternKind, examples: &[FewShotExample]) -> String {
    examples
        .iter()
        .map(|example| match pattern {
            PatternKind::Shortcut => shortcut_snippet(example),
            PatternKind::Subclass => subclass_snippet(example),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn shortcut_snippet(ex: &FewShotExample) -> String {
    let r_label = ex.r_label.as_deref().filter(|r| !r.is_empty()).unwrap_or("...");
    let property = ex.property.as_deref().unwrap_or("...");
    format!(
        "Input:\n\
         - Class A: {}\n  - Property p: {}\n\
         - Class B: {}\n  - Property r: {}\n\
         - Class C: {}\n\n\
         Suggested Property Name: {}\n---",
        ex.a_label, ex.p_label, ex.b_label, r_label, ex.c_label, property
    )
}

fn subclass_snippet(ex: &FewShotExample) -> String {
    let subclass = ex.subclass.as_deref().unwrap_or("...");
    format!(
        "Input:\n\
         - Class A: {a}:\n  - Property p ({p}):\n    - Domain: {a}\n    - Range: {b}\n\
         - Class B: {b}\n\
         - Class C: {c}, a subclass of {b}\n\n\
         Suggested Class Name: {s}\n---",
        a = ex.a_label,
        p = ex.p_label,
        b = ex.b_label,
        c = ex.c_label,
        s = subclass
    )
}
