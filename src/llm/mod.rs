//! LLM Provider Clients and Routing
//!
//! This module provides a unified interface for the three upstream
//! chat-completion backends the service can dispatch to.
//!
//! # Architecture
//!
//! - [`ProviderClient`] - The capability every backend implements
//! - [`ProviderKind`] - Closed set of backends, used as the dispatch tag
//! - [`ProviderRegistry`] - Model routing plus client lookup, built at startup
//!
//! # Supported Providers
//!
//! - `openai` - OpenAI API (GPT-4o, GPT-4.1, o-series)
//! - `ollama` - Ollama server (local or hosted)
//! - `tgi` - HuggingFace Text Generation Inference, registered only when
//!   reachable at startup
//!
//! # Example
//!
//! ```ignore
//! use ontopat::llm::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&config).await;
//! let kind = registry.route("gpt-4o")?;
//! let text = registry.send(kind, "gpt-4o", prompt, &params, None).await?;
//! ```

/// Provider client trait, provider identity and completion cleanup.
pub mod client;
/// Ollama native chat client.
pub mod ollama;
/// OpenAI chat completions client.
pub mod openai;
/// Registry for routing models to provider clients.
pub mod provider_registry;
/// Text Generation Inference client.
pub mod tgi;

pub use client::{clean_completion, ProviderClient, ProviderKind};
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
pub use provider_registry::ProviderRegistry;
pub use tgi::TgiClient;
