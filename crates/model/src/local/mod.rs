//! In-process model provider.
//!
//! Wraps a locally resident model runtime behind the same [`LLM`] surface
//! as the network providers. The runtime is injected by the embedder as an
//! [`Engine`]: an async pull-based sequence of chunks, no network involved.
//! The generator running dry is the terminal signal.

use futures_core::Stream;
use futures_util::StreamExt;
use llm::{ChatOptions, Error, LLM, Message, Response, Result, StreamChunk};
use std::{pin::Pin, sync::Arc};

/// A locally loaded model runtime.
///
/// Implementations yield unified [`StreamChunk`]s until generation is
/// exhausted; terminal is exhaustion, not a sentinel event.
pub trait Engine: Send + Sync {
    /// The model identifier reported by the runtime.
    fn model(&self) -> &str;

    /// Begin generating for the message list.
    fn generate(
        &self,
        options: &ChatOptions,
        messages: &[Message],
    ) -> Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;
}

/// The in-process LLM provider.
#[derive(Clone)]
pub struct Local {
    engine: Arc<dyn Engine>,
}

impl Local {
    /// Create a provider over an injected engine.
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// The model identifier of the underlying engine.
    pub fn model(&self) -> &str {
        self.engine.model()
    }
}

impl LLM for Local {
    type ChatConfig = ChatOptions;

    async fn send(&self, config: &ChatOptions, messages: &[Message]) -> Result<Response> {
        let mut stream = self.engine.generate(config, messages);
        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            if let Some(text) = chunk?.content() {
                content.push_str(text);
            }
        }
        if content.is_empty() {
            return Err(Error::Empty);
        }

        let mut response = Response::text(content);
        response.meta.model = self.engine.model().into();
        response.meta.object = "chat.completion".into();
        Ok(response)
    }

    fn stream(
        &self,
        config: ChatOptions,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        self.engine.generate(&config, messages)
    }
}
