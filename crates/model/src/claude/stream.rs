//! SSE event parsing for the Anthropic streaming Messages API.
//!
//! Anthropic streaming events differ from the chat completions format:
//! - `message_start` — initial message metadata
//! - `content_block_start` — begin a content block
//! - `content_block_delta` — incremental content (`delta.text`)
//! - `content_block_stop` — end of a content block
//! - `message_delta` — final stop_reason
//! - `message_stop` — end of message

use compact_str::CompactString;
use llm::{FinishReason, StreamChunk};
use serde::Deserialize;

/// A raw SSE event from the Anthropic streaming API.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Initial message metadata.
    #[serde(rename = "message_start")]
    MessageStart {
        /// The started message.
        message: MessageMeta,
    },
    /// Begin a content block.
    #[serde(rename = "content_block_start")]
    ContentBlockStart {
        /// Block index within the message.
        index: u32,
        /// The opening block.
        content_block: ContentBlock,
    },
    /// Incremental content within a block.
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta {
        /// Block index within the message.
        index: u32,
        /// The delta payload.
        delta: BlockDelta,
    },
    /// End of a content block.
    #[serde(rename = "content_block_stop")]
    ContentBlockStop {},
    /// Final message delta (stop reason).
    #[serde(rename = "message_delta")]
    MessageDelta {
        /// The closing delta body.
        delta: MessageDeltaBody,
    },
    /// End of message. The terminal event for this stream format.
    #[serde(rename = "message_stop")]
    MessageStop,
    /// Ping (keep-alive).
    #[serde(rename = "ping")]
    Ping,
    /// Catch-all for unknown event types.
    #[serde(other)]
    Unknown,
}

/// Metadata carried by `message_start`.
#[derive(Debug, Deserialize)]
pub struct MessageMeta {
    /// Message identifier.
    pub id: CompactString,
    /// Model that is generating.
    pub model: CompactString,
}

/// A content block opened by `content_block_start`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A text block, possibly carrying initial text.
    #[serde(rename = "text")]
    Text {
        /// Initial text, usually empty.
        text: String,
    },
    /// A block kind this client does not model.
    #[serde(other)]
    Unknown,
}

/// A delta within `content_block_delta`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BlockDelta {
    /// Incremental text.
    #[serde(rename = "text_delta")]
    TextDelta {
        /// The text fragment.
        text: String,
    },
    /// A delta kind this client does not model.
    #[serde(other)]
    Unknown,
}

/// The body of a `message_delta` event.
#[derive(Debug, Deserialize)]
pub struct MessageDeltaBody {
    /// Why the model stopped, when it did.
    pub stop_reason: Option<CompactString>,
}

impl Event {
    /// Convert this Anthropic event to a unified [`StreamChunk`].
    ///
    /// Returns `None` for events that carry no output (ping, block stop,
    /// message stop, unknown kinds).
    pub fn into_chunk(self) -> Option<StreamChunk> {
        match self {
            Self::MessageStart { message } => {
                let mut chunk = StreamChunk::default();
                chunk.meta.id = message.id;
                chunk.meta.model = message.model;
                chunk.meta.object = "chat.completion.chunk".into();
                Some(chunk)
            }
            Self::ContentBlockStart {
                content_block: ContentBlock::Text { text },
                ..
            } => {
                if text.is_empty() {
                    None
                } else {
                    Some(StreamChunk::text(text))
                }
            }
            Self::ContentBlockDelta {
                delta: BlockDelta::TextDelta { text },
                ..
            } => Some(StreamChunk::text(text)),
            Self::MessageDelta { delta } => {
                let reason = delta.stop_reason.as_deref().map(|reason| match reason {
                    "end_turn" | "stop" => FinishReason::Stop,
                    "max_tokens" => FinishReason::Length,
                    "refusal" => FinishReason::ContentFilter,
                    _ => FinishReason::Stop,
                });
                reason.map(StreamChunk::finish)
            }
            Self::ContentBlockStart { .. }
            | Self::ContentBlockDelta { .. }
            | Self::ContentBlockStop {}
            | Self::MessageStop
            | Self::Ping
            | Self::Unknown => None,
        }
    }
}
