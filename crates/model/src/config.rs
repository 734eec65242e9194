//! Provider configuration.
//!
//! Unified config for the remote (API-key-based) backends. Uses
//! `#[serde(tag = "provider", flatten)]` so all fields appear at the same
//! level in TOML/JSON. The in-process engine is injected by the embedder,
//! not built from config.

use anyhow::{Result, bail};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Named provider configuration. Combines identity (`name`) with the
/// provider-specific backend settings via `BackendConfig`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Unique name for this provider entry. Defaults to `"default"`.
    #[serde(default = "default_name")]
    pub name: CompactString,
    /// Model identifier, passed to `ChatOptions::model` for requests.
    pub model: CompactString,
    /// Provider-specific settings, discriminated by the `provider` field.
    #[serde(flatten)]
    pub backend: BackendConfig,
}

impl ProviderConfig {
    /// Human-readable provider kind string for logging.
    pub fn kind(&self) -> &'static str {
        match &self.backend {
            BackendConfig::OpenAI(_) => "openai",
            BackendConfig::OpenRouter(_) => "openrouter",
            BackendConfig::Compatible(_) => "compatible",
            BackendConfig::Ollama(_) => "ollama",
            BackendConfig::Claude(_) => "claude",
        }
    }

    /// Check the config for the fields its backend requires.
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            bail!("provider '{}' requires a model", self.name);
        }
        match &self.backend {
            BackendConfig::OpenAI(rc)
            | BackendConfig::OpenRouter(rc)
            | BackendConfig::Claude(rc) => {
                if rc.api_key.is_empty() {
                    bail!("provider '{}' requires an api_key", self.name);
                }
            }
            BackendConfig::Compatible(rc) => {
                if rc.base_url.is_none() {
                    bail!("provider '{}' requires a base_url", self.name);
                }
            }
            BackendConfig::Ollama(_) => {}
        }
        Ok(())
    }
}

/// Provider-specific configuration, discriminated by the `provider` field
/// in TOML/JSON.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Hosted OpenAI API.
    #[serde(rename = "openai")]
    OpenAI(RemoteConfig),
    /// OpenRouter API.
    #[serde(rename = "openrouter")]
    OpenRouter(RemoteConfig),
    /// Any other OpenAI-compatible endpoint; `base_url` required.
    Compatible(RemoteConfig),
    /// Ollama local API, no key required.
    Ollama(OllamaConfig),
    /// Claude (Anthropic) Messages API.
    Claude(RemoteConfig),
}

/// Configuration for remote HTTP API providers.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RemoteConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// Optional base URL override for the provider endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Configuration for Ollama (OpenAI-compatible, no key required).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OllamaConfig {
    /// Optional base URL override. Defaults to the local Ollama endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_name() -> CompactString {
    CompactString::from("default")
}
