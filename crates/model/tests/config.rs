//! Tests for provider config validation and dispatch.

use futures_core::Stream;
use kelp_model::{Engine, Provider, ProviderConfig, build_provider};
use llm::{ChatOptions, Client, Message, Result, StreamChunk};
use serde_json::json;
use std::pin::Pin;
use std::sync::Arc;

fn config(value: serde_json::Value) -> ProviderConfig {
    serde_json::from_value(value).expect("config")
}

#[test]
fn claude_config_builds_a_claude_provider() {
    let config = config(json!({
        "name": "work",
        "provider": "claude",
        "model": "claude-3-5-sonnet",
        "api_key": "sk-ant",
    }));
    assert_eq!(config.kind(), "claude");
    let provider = build_provider(&config, Client::new()).expect("provider");
    assert_eq!(provider.kind(), "claude");
}

#[test]
fn ollama_config_builds_an_openai_compatible_provider() {
    let config = config(json!({
        "provider": "ollama",
        "model": "llama3.2",
    }));
    assert_eq!(config.name, "default");
    assert_eq!(config.kind(), "ollama");
    let provider = build_provider(&config, Client::new()).expect("provider");
    assert_eq!(provider.kind(), "openai");
}

#[test]
fn missing_api_key_fails_validation() {
    let config = config(json!({
        "provider": "openai",
        "model": "gpt-4o-mini",
    }));
    assert!(config.validate().is_err());
    assert!(build_provider(&config, Client::new()).is_err());
}

#[test]
fn compatible_requires_a_base_url() {
    let bad = config(json!({
        "provider": "compatible",
        "model": "local-model",
        "api_key": "ignored",
    }));
    assert!(bad.validate().is_err());

    let good = config(json!({
        "provider": "compatible",
        "model": "local-model",
        "base_url": "http://localhost:8080/v1/chat/completions",
    }));
    assert!(good.validate().is_ok());
    let provider = build_provider(&good, Client::new()).expect("provider");
    assert_eq!(provider.kind(), "openai");
}

#[test]
fn config_round_trips_through_serde() {
    let config = config(json!({
        "name": "router",
        "provider": "openrouter",
        "model": "meta-llama/llama-3-70b",
        "api_key": "or-key",
    }));
    let value = serde_json::to_value(&config).expect("serialize");
    assert_eq!(value["provider"], "openrouter");
    assert_eq!(value["model"], "meta-llama/llama-3-70b");
}

struct NullEngine;

impl Engine for NullEngine {
    fn model(&self) -> &str {
        "null"
    }

    fn generate(
        &self,
        _options: &ChatOptions,
        _messages: &[Message],
    ) -> Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>> {
        Box::pin(futures_util::stream::empty())
    }
}

#[test]
fn injected_engines_become_local_providers() {
    let provider = Provider::local(Arc::new(NullEngine));
    assert_eq!(provider.kind(), "local");
}
