//! TOML-based configuration
//!
//! Infrastructure settings (server, prompt directory, provider endpoints,
//! model routing table, transient store) are read from `ontopat.toml`.
//! Secrets are never stored in the file: providers reference the name of the
//! environment variable that holds them, and `.env` is loaded with `dotenvy`
//! before the file is parsed.
//!
//! `HOST`, `PORT` and `ALLOWED_ORIGINS` in the environment override the
//! corresponding `[server]` keys.

use crate::llm::ProviderKind;
use crate::llm::{ollama, openai, tgi};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from ontopat.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntoConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub prompts: PromptsConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Model name -> provider routing table (TGI models live under
    /// `[providers.tgi]` because they depend on the startup probe)
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, ProviderKind>,

    #[serde(default)]
    pub transient: TransientConfig,
}

impl Default for OntoConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            prompts: PromptsConfig::default(),
            providers: ProvidersConfig::default(),
            models: default_models(),
            transient: TransientConfig::default(),
        }
    }
}

fn default_models() -> BTreeMap<String, ProviderKind> {
    [
        ("gpt-4.1-2025-04-14", ProviderKind::OpenAI),
        ("gpt-4o", ProviderKind::OpenAI),
        ("o3-mini-2025-01-31", ProviderKind::OpenAI),
        ("o4-mini-2025-04-16", ProviderKind::OpenAI),
        ("gpt-3.5-turbo", ProviderKind::OpenAI),
        ("deepseek-r1-distill-llama-70b:q4", ProviderKind::Ollama),
        ("llama-3.3-70b-instruct:q4", ProviderKind::Ollama),
    ]
    .into_iter()
    .map(|(model, kind)| (model.to_string(), kind))
    .collect()
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            cors_origins: Vec::new(),
        }
    }
}

// ============= Prompt Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsConfig {
    /// Root of the `{pattern}/{provider}/{technique}.txt` template tree
    #[serde(default = "default_prompts_dir")]
    pub dir: PathBuf,
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("./prompts")
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: default_prompts_dir(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAIProviderConfig,

    #[serde(default)]
    pub ollama: OllamaProviderConfig,

    /// Optional TGI endpoint, probed at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgi: Option<TgiProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIProviderConfig {
    /// Environment variable containing the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base")]
    pub api_base: String,

    /// Models whose temperature is forced to 1.0
    #[serde(default = "default_reasoning_models")]
    pub reasoning_models: Vec<String>,
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_reasoning_models() -> Vec<String> {
    openai::DEFAULT_REASONING_MODELS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for OpenAIProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            api_base: default_openai_base(),
            reasoning_models: default_reasoning_models(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaProviderConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    #[serde(default = "default_num_ctx")]
    pub num_ctx: u32,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_num_ctx() -> u32 {
    ollama::DEFAULT_NUM_CTX
}

impl Default for OllamaProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            num_ctx: default_num_ctx(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgiProviderConfig {
    pub base_url: String,

    #[serde(default = "default_tgi_max_tokens")]
    pub max_tokens: u32,

    /// Model names routed to TGI when the probe succeeds
    #[serde(default = "default_tgi_models")]
    pub models: Vec<String>,
}

fn default_tgi_max_tokens() -> u32 {
    tgi::DEFAULT_MAX_TOKENS
}

fn default_tgi_models() -> Vec<String> {
    vec!["llama-3.1-8b-instruct(fp16)".to_string()]
}

// ============= Transient Store Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientConfig {
    /// Delay before the read endpoint answers, giving a slow producer time
    /// to store the value
    #[serde(default = "default_rendezvous_delay_ms")]
    pub rendezvous_delay_ms: u64,

    /// Maximum number of entries held at once
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entries older than this are treated as absent (0 disables expiry)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_rendezvous_delay_ms() -> u64 {
    2000
}

fn default_capacity() -> usize {
    1024
}

fn default_ttl_secs() -> u64 {
    600
}

impl TransientConfig {
    pub fn rendezvous_delay(&self) -> Duration {
        Duration::from_millis(self.rendezvous_delay_ms)
    }

    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl Default for TransientConfig {
    fn default() -> Self {
        Self {
            rendezvous_delay_ms: default_rendezvous_delay_ms(),
            capacity: default_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' has an invalid value: {1}")]
    InvalidEnvVar(String, String),
}

impl OntoConfig {
    /// Load configuration from a TOML file, apply environment overrides and
    /// validate the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config: OntoConfig = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `ALLOWED_ORIGINS` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = self.resolve_env("HOST") {
            self.server.host = host;
        }

        if let Some(port) = self.resolve_env("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("PORT".to_string(), port.clone()))?;
        }

        if let Some(origins) = self.resolve_env("ALLOWED_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty() && *o != "*")
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() && self.providers.tgi.is_none() {
            return Err(ConfigError::ValidationError(
                "No models configured: add entries under [models]".to_string(),
            ));
        }

        if let Some((model, _)) = self
            .models
            .iter()
            .find(|(_, kind)| **kind == ProviderKind::Tgi)
        {
            return Err(ConfigError::ValidationError(format!(
                "Model '{}' maps to tgi in [models]; list TGI models under [providers.tgi] models instead",
                model
            )));
        }

        if let Some(ref tgi) = self.providers.tgi {
            if tgi.base_url.is_empty() {
                return Err(ConfigError::ValidationError(
                    "providers.tgi.base_url must not be empty".to_string(),
                ));
            }
            if let Some(model) = tgi.models.iter().find(|m| self.models.contains_key(*m)) {
                return Err(ConfigError::ValidationError(format!(
                    "Model '{}' is listed both under [models] and [providers.tgi]",
                    model
                )));
            }
        }

        if self.transient.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "transient.capacity must be greater than zero".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'pretty' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
