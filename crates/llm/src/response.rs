//! Chat response abstractions for the unified LLM interfaces.

use crate::{Message, Role};
use compact_str::CompactString;
use serde::Deserialize;

/// Common metadata shared between streaming and non-streaming completions.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionMeta {
    /// A unique identifier for the chat completion.
    #[serde(default)]
    pub id: CompactString,

    /// The object type.
    #[serde(default)]
    pub object: CompactString,

    /// Unix timestamp (in seconds) of when the response was created.
    #[serde(default)]
    pub created: u64,

    /// The model used for the completion.
    #[serde(default)]
    pub model: CompactString,

    /// Backend configuration identifier.
    #[serde(default)]
    pub system_fingerprint: Option<CompactString>,
}

/// Message content in a completion response.
///
/// Used for both streaming deltas and non-streaming response messages.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Delta {
    /// The role of the message author.
    #[serde(default)]
    pub role: Option<Role>,

    /// The content of the message.
    #[serde(default)]
    pub content: Option<String>,
}

/// A completion choice.
///
/// Non-streaming bodies name the payload `message`, streaming bodies name
/// it `delta`; the alias lets one shape deserialize both.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Choice {
    /// The index of this choice in the list.
    #[serde(default)]
    pub index: u32,

    /// The delta (or full message) content for this choice.
    #[serde(default, alias = "message")]
    pub delta: Delta,

    /// The reason the model stopped generating.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// A non-streaming chat completion response.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Response {
    /// Completion metadata.
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Response {
    /// Build a response carrying a single assistant text choice.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                delta: Delta {
                    role: Some(Role::Assistant),
                    content: Some(content.into()),
                },
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    /// The content of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// The first choice as an assistant [`Message`].
    pub fn message(&self) -> Option<Message> {
        self.content().map(Message::assistant)
    }

    /// The reason the model stopped generating.
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}

/// The reason the model stopped generating.
///
/// Parsed leniently: a reason this client does not model folds into
/// [`Other`](Self::Other) instead of failing the whole chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FinishReason {
    /// The model finished naturally.
    Stop,

    /// The model hit the max token limit.
    Length,

    /// Content was filtered by the provider.
    ContentFilter,

    /// A reason this client does not model.
    Other,
}

impl From<String> for FinishReason {
    fn from(reason: String) -> Self {
        match reason.as_str() {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}
