//! Provider Registry: model routing and client dispatch
//!
//! The registry is built once at startup from configuration and shared
//! read-only behind an `Arc`. It answers two questions:
//!
//! - which [`ProviderKind`] serves a model name ([`ProviderRegistry::route`])
//! - which [`ProviderClient`] executes a call for that kind
//!   ([`ProviderRegistry::send`])
//!
//! The TGI backend is optional: its models and client are only registered
//! when the endpoint answered the startup probe.

use crate::llm::client::{clean_completion, ProviderClient, ProviderKind};
use crate::llm::ollama::OllamaClient;
use crate::llm::openai::OpenAIClient;
use crate::llm::tgi::TgiClient;
use crate::types::{AppError, GenerationParams, ModelProviderMap, Result};
use crate::utils::toml_config::OntoConfig;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

/// Registry of models and the provider clients that serve them.
pub struct ProviderRegistry {
    /// Model name -> provider
    models: BTreeMap<String, ProviderKind>,
    /// Provider -> client
    clients: HashMap<ProviderKind, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
            clients: HashMap::new(),
        }
    }

    /// Build the registry from configuration.
    ///
    /// Probes the TGI endpoint when one is configured; on failure its models
    /// are left out and requests for them are rejected as unknown.
    pub async fn from_config(config: &OntoConfig) -> Self {
        let mut registry = Self::new();

        let openai = &config.providers.openai;
        let api_key = config.resolve_env(&openai.api_key_env);
        if api_key.is_none() {
            warn!(
                env = %openai.api_key_env,
                "OpenAI API key not found in environment; OpenAI models will fail"
            );
        }
        registry.register_client(Arc::new(
            OpenAIClient::new(api_key, openai.api_base.clone())
                .with_reasoning_models(openai.reasoning_models.clone()),
        ));

        let ollama = &config.providers.ollama;
        registry.register_client(Arc::new(
            OllamaClient::new(ollama.base_url.clone()).with_num_ctx(ollama.num_ctx),
        ));

        for (model, kind) in &config.models {
            registry.register_model(model, *kind);
        }

        if let Some(tgi) = &config.providers.tgi {
            let client = TgiClient::new(tgi.base_url.clone()).with_max_tokens(tgi.max_tokens);
            if client.probe().await {
                registry.register_client(Arc::new(client));
                for model in &tgi.models {
                    registry.register_model(model, ProviderKind::Tgi);
                }
            }
        }

        info!(
            models = registry.models.len(),
            providers = registry.clients.len(),
            "Provider registry ready"
        );

        registry
    }

    /// Map a model name to the provider that serves it
    pub fn register_model(&mut self, model: &str, kind: ProviderKind) {
        self.models.insert(model.to_string(), kind);
    }

    /// Register a client under the kind it reports
    pub fn register_client(&mut self, client: Arc<dyn ProviderClient>) {
        self.clients.insert(client.kind(), client);
    }

    /// Resolve the provider for a model name.
    pub fn route(&self, model: &str) -> Result<ProviderKind> {
        self.models
            .get(model)
            .copied()
            .ok_or_else(|| AppError::UnknownModel(model.to_string()))
    }

    /// Get the client for a provider
    pub fn client(&self, kind: ProviderKind) -> Result<&Arc<dyn ProviderClient>> {
        self.clients.get(&kind).ok_or_else(|| {
            AppError::ProviderUnavailable(format!(
                "{} is not reachable from this server",
                kind.display_name()
            ))
        })
    }

    /// Send a prompt to the provider's client and clean the completion.
    pub async fn send(
        &self,
        kind: ProviderKind,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        schema: Option<&serde_json::Value>,
    ) -> Result<String> {
        let client = self.client(kind)?;
        let raw = client.send(model, prompt, params, schema).await?;
        Ok(clean_completion(&raw))
    }

    /// Snapshot of the model -> provider map
    pub fn model_map(&self) -> ModelProviderMap {
        self.models.clone()
    }

    /// Check if a model is routable
    pub fn has_model(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Check if a client is registered for a provider
    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        self.clients.contains_key(&kind)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
