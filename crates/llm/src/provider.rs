//! Provider abstractions for the unified LLM interfaces.

use crate::{ChatOptions, Message, Response, Result, StreamChunk};
use futures_core::Stream;

/// A trait for LLM providers.
///
/// `stream` powers the main chat turn; `send` is the non-streaming
/// variant used for vision analysis and title summarization. Image
/// generation defaults to unsupported; backends that can draw override it.
pub trait LLM: Clone {
    /// The wire request configuration, built from [`ChatOptions`].
    type ChatConfig: From<ChatOptions> + Send;

    /// Send a message list to the LLM and await the full response.
    fn send(
        &self,
        config: &Self::ChatConfig,
        messages: &[Message],
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a message list to the LLM with streaming.
    fn stream(
        &self,
        config: Self::ChatConfig,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send;

    /// Generate an image for the prompt, resolving to a URL or data URI.
    fn generate_image(&self, _prompt: &str) -> impl Future<Output = Result<String>> + Send {
        async { Err(crate::Error::Unsupported("image generation")) }
    }
}
