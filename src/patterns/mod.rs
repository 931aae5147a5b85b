//! Pattern pipeline: prompt, provider call, typed response.

/// JSON reply parsing with field defaults.
pub mod normalizer;

pub use normalizer::normalize;

use crate::llm::ProviderRegistry;
use crate::prompts::PromptBuilder;
use crate::types::{PatternKind, PatternRequest, PatternResponse, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Runs pattern requests end to end.
pub struct PatternService {
    registry: Arc<ProviderRegistry>,
    builder: PromptBuilder,
}

impl PatternService {
    pub fn new(registry: Arc<ProviderRegistry>, builder: PromptBuilder) -> Self {
        Self { registry, builder }
    }

    /// The prompt that `generate` would send, without calling a provider.
    #[instrument(skip(self, request), fields(model = %request.model_name))]
    pub async fn preview(&self, pattern: PatternKind, request: &PatternRequest) -> Result<String> {
        let built = self.builder.build(pattern, request).await?;
        Ok(built.text)
    }

    /// Build the prompt, make exactly one provider call and parse the reply.
    #[instrument(skip(self, request), fields(model = %request.model_name))]
    pub async fn generate(
        &self,
        pattern: PatternKind,
        request: &PatternRequest,
    ) -> Result<PatternResponse> {
        let built = self.builder.build(pattern, request).await?;

        let started = Instant::now();
        let text = self
            .registry
            .send(
                built.provider,
                &request.model_name,
                &built.text,
                &request.params,
                built.schema.as_ref(),
            )
            .await?;

        info!(
            provider = %built.provider,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Provider call completed"
        );

        normalize(pattern, &text)
    }
}
