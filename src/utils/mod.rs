//! Configuration utilities.

/// TOML configuration with environment overrides.
pub mod toml_config;
