//! # OntoPat - Ontology Patterns Backend
//!
//! An HTTP service that turns ontology design pattern requests (class,
//! property and relation labels) into LLM prompts, sends them to one of
//! several providers and returns the parsed suggestion.
//!
//! ## Overview
//!
//! Two patterns are supported:
//!
//! 1. **Shortcut** - given `A -p-> B -r-> C`, suggest a property linking A to C
//! 2. **Subclass** - given a property whose range is B, suggest a subclass C of B
//!
//! A request flows through the same pipeline for both:
//!
//! ```text
//! model name -> ProviderRegistry::route
//!            -> TemplateResolver (pattern/provider/technique + output schema)
//!            -> PromptBuilder (labels + few-shot block)
//!            -> ProviderClient::send
//!            -> normalize (JSON reply -> typed response)
//! ```
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ontopat::{AppState, OntoConfig};
//! use ontopat::types::{PatternKind, PatternRequest};
//!
//! let config = OntoConfig::load("ontopat.toml")?;
//! let state = AppState::from_config(config).await;
//!
//! let response = state.patterns.generate(PatternKind::Shortcut, &request).await?;
//! ```
//!
//! ## Providers
//!
//! | Provider | Endpoint | Structured output |
//! |----------|----------|-------------------|
//! | `openai` | `/chat/completions` | prompt only |
//! | `ollama` | `/api/chat` | `format` = output schema |
//! | `tgi` | `/v1/chat/completions` | `response_format` = output schema |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`llm`] - Provider clients and model routing
//! - [`prompts`] - Template lookup and prompt rendering
//! - [`patterns`] - Pattern service and reply normalization
//! - [`store`] - One-time transient storage
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and routing.
pub mod llm;
/// Pattern pipeline.
pub mod patterns;
/// Prompt templates.
pub mod prompts;
/// Transient hand-off store.
pub mod store;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use llm::{ProviderClient, ProviderKind, ProviderRegistry};
pub use patterns::PatternService;
pub use store::TransientStore;
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, OntoConfig};

use crate::prompts::{FsPromptStore, PromptBuilder, TemplateResolver};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<OntoConfig>,
    /// Model routing and provider clients
    pub registry: Arc<ProviderRegistry>,
    /// Prompt building and generation
    pub patterns: Arc<PatternService>,
    /// One-time hand-off store
    pub transient: Arc<TransientStore>,
}

impl AppState {
    /// Build state from configuration, probing optional providers.
    pub async fn from_config(config: OntoConfig) -> Self {
        let registry = ProviderRegistry::from_config(&config).await;
        Self::with_registry(config, registry)
    }

    /// Build state around an existing registry.
    pub fn with_registry(config: OntoConfig, registry: ProviderRegistry) -> Self {
        let registry = Arc::new(registry);
        let resolver = TemplateResolver::new(FsPromptStore::new(config.prompts.dir.clone()));
        let builder = PromptBuilder::new(registry.clone(), resolver);
        let patterns = Arc::new(PatternService::new(registry.clone(), builder));
        let transient = Arc::new(TransientStore::from_config(&config.transient));

        Self {
            config: Arc::new(config),
            registry,
            patterns,
            transient,
        }
    }
}
