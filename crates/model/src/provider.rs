//! Provider implementation.
//!
//! Unified `Provider` enum with enum dispatch over concrete backends,
//! resolved once from config at call entry. Call sites never branch on
//! model-name strings.

use crate::{
    Claude, Engine, Local, OpenAI,
    config::{BackendConfig, ProviderConfig},
    claude, openai,
};
use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{ChatOptions, Client, LLM, Message, Response, StreamChunk};
use std::{pin::pin, sync::Arc};

/// Unified LLM provider enum.
///
/// The chat layer is monomorphized on `Provider`; which variant to build
/// is decided once, from [`ProviderConfig`] or an injected engine.
#[derive(Clone)]
pub enum Provider {
    /// OpenAI-compatible API (covers OpenAI, OpenRouter, Ollama, and
    /// arbitrary compatible endpoints).
    OpenAI(OpenAI),
    /// Anthropic Messages API.
    Claude(Claude),
    /// In-process model engine.
    Local(Local),
}

impl Provider {
    /// Create a provider over an in-process engine.
    pub fn local(engine: Arc<dyn Engine>) -> Self {
        Self::Local(Local::new(engine))
    }

    /// Human-readable provider kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OpenAI(_) => "openai",
            Self::Claude(_) => "claude",
            Self::Local(_) => "local",
        }
    }
}

/// Construct a `Provider` from config and a shared HTTP client.
pub fn build_provider(config: &ProviderConfig, client: Client) -> Result<Provider> {
    config.validate()?;
    let provider = match &config.backend {
        BackendConfig::OpenAI(rc) => match &rc.base_url {
            Some(url) => Provider::OpenAI(OpenAI::custom(client, &rc.api_key, url)?),
            None => Provider::OpenAI(OpenAI::api(client, &rc.api_key)?),
        },
        BackendConfig::OpenRouter(rc) => match &rc.base_url {
            Some(url) => Provider::OpenAI(OpenAI::custom(client, &rc.api_key, url)?),
            None => Provider::OpenAI(OpenAI::openrouter(client, &rc.api_key)?),
        },
        BackendConfig::Compatible(rc) => {
            let url = rc
                .base_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("compatible provider requires base_url"))?;
            Provider::OpenAI(OpenAI::custom(client, &rc.api_key, url)?)
        }
        BackendConfig::Ollama(oc) => match &oc.base_url {
            Some(url) => Provider::OpenAI(OpenAI::custom(client, "", url)?),
            None => Provider::OpenAI(OpenAI::ollama(client)),
        },
        BackendConfig::Claude(rc) => match &rc.base_url {
            Some(url) => Provider::Claude(Claude::custom(client, &rc.api_key, url)?),
            None => Provider::Claude(Claude::anthropic(client, &rc.api_key)?),
        },
    };
    Ok(provider)
}

impl LLM for Provider {
    type ChatConfig = ChatOptions;

    async fn send(&self, config: &ChatOptions, messages: &[Message]) -> llm::Result<Response> {
        match self {
            Self::OpenAI(p) => {
                let req = openai::Request::from(config.clone());
                p.send(&req, messages).await
            }
            Self::Claude(p) => {
                let req = claude::Request::from(config.clone());
                p.send(&req, messages).await
            }
            Self::Local(p) => p.send(config, messages).await,
        }
    }

    fn stream(
        &self,
        config: ChatOptions,
        messages: &[Message],
    ) -> impl Stream<Item = llm::Result<StreamChunk>> + Send {
        let messages = messages.to_vec();
        let this = self.clone();
        try_stream! {
            match this {
                Provider::OpenAI(p) => {
                    let req = openai::Request::from(config);
                    let mut stream = pin!(p.stream(req, &messages));
                    while let Some(chunk) = stream.next().await {
                        yield chunk?;
                    }
                }
                Provider::Claude(p) => {
                    let req = claude::Request::from(config);
                    let mut stream = pin!(p.stream(req, &messages));
                    while let Some(chunk) = stream.next().await {
                        yield chunk?;
                    }
                }
                Provider::Local(p) => {
                    let mut stream = pin!(p.stream(config, &messages));
                    while let Some(chunk) = stream.next().await {
                        yield chunk?;
                    }
                }
            }
        }
    }

    async fn generate_image(&self, prompt: &str) -> llm::Result<String> {
        match self {
            Self::OpenAI(p) => p.generate_image(prompt).await,
            Self::Claude(p) => p.generate_image(prompt).await,
            Self::Local(p) => p.generate_image(prompt).await,
        }
    }
}
