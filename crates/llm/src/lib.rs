//! Unified LLM interface types and traits.
//!
//! This crate provides the shared types used across all kelp providers:
//! `Message`, `ChatOptions`, `Response`, `StreamChunk`, and the `LLM` trait.
//! Also provides the SSE chunk decoder shared by every streaming transport
//! and, behind the `http` feature, `HttpProvider` for OpenAI-compatible
//! HTTP transport.

pub use config::ChatOptions;
pub use decode::{SseDecoder, SseFrame, decode_stream, parse};
pub use error::{Error, Result};
#[cfg(feature = "http")]
pub use http::HttpProvider;
pub use message::{
    Content, ContentPart, DIRECTIVE_PREFIX, ImageSource, ImageUrl, Message, Role,
};
pub use noop::NoopProvider;
pub use provider::LLM;
#[cfg(feature = "http")]
pub use reqwest::{self, Client};
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response};
pub use stream::StreamChunk;

mod config;
mod decode;
mod error;
#[cfg(feature = "http")]
mod http;
mod message;
mod noop;
mod provider;
mod response;
mod stream;
