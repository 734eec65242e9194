//! Kelp LLM provider implementations.
//!
//! One adapter per backend family: [`OpenAI`] for OpenAI-compatible HTTP
//! APIs (hosted or local), [`Claude`] for the Anthropic Messages API, and
//! [`Local`] for an in-process model engine. [`Provider`] is the unified
//! dispatch enum resolved once from [`ProviderConfig`].

pub use claude::Claude;
pub use config::{BackendConfig, OllamaConfig, ProviderConfig, RemoteConfig};
pub use local::{Engine, Local};
pub use openai::OpenAI;
pub use provider::{Provider, build_provider};

pub mod claude;
mod config;
pub mod local;
pub mod openai;
mod provider;
