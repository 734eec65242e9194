//! Chat completions request body for OpenAI-compatible endpoints.
//!
//! Fields use `Option` + `skip_serializing_if` so provider-specific
//! extras are simply absent when unused. Message ids never reach the
//! wire; the body carries its own message shapes.

use llm::{ChatOptions, Content, ContentPart, Message};
use serde::Serialize;
use serde_json::{Value, json};

/// Model-name markers for reasoning-tier models, which reject sampling
/// parameters and take an effort hint instead.
const REASONING_MARKERS: &[&str] = &["o1", "o3", "o4", "gpt-5"];

/// Default effort sent to reasoning-tier models when none is configured.
const DEFAULT_REASONING_EFFORT: &str = "medium";

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The messages to send.
    pub messages: Vec<Value>,
    /// The model identifier.
    pub model: String,
    /// Sampling temperature. Omitted for reasoning-tier models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate. Omitted for reasoning-tier models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Top-p sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Effort hint for reasoning-tier models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl Request {
    /// Whether the model name marks a reasoning-tier model.
    pub fn is_reasoning(model: &str) -> bool {
        REASONING_MARKERS.iter().any(|marker| model.contains(marker))
    }

    /// Build the request with the given messages, converting to the chat
    /// completions wire format.
    pub fn messages(&self, messages: &[Message]) -> Self {
        Self {
            messages: messages.iter().map(wire_message).collect(),
            ..self.clone()
        }
    }

    /// Enable streaming for the request.
    pub fn stream(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

impl From<ChatOptions> for Request {
    fn from(options: ChatOptions) -> Self {
        let reasoning = Self::is_reasoning(&options.model);
        Self {
            messages: Vec::new(),
            temperature: if reasoning { None } else { options.temperature },
            max_tokens: if reasoning { None } else { options.max_tokens },
            top_p: if reasoning { None } else { options.top_p },
            reasoning_effort: reasoning.then(|| {
                options
                    .reasoning_effort
                    .unwrap_or_else(|| DEFAULT_REASONING_EFFORT.to_owned())
            }),
            model: options.model,
            stream: None,
        }
    }
}

/// Convert one message to its wire shape, dropping the local id.
fn wire_message(message: &Message) -> Value {
    json!({
        "role": message.role,
        "content": wire_content(&message.content),
    })
}

/// Convert message content to the chat completions content shape.
///
/// Inline base64 images are normalized to data-URI `image_url` parts so
/// a history built for the Anthropic shape can still be sent here.
fn wire_content(content: &Content) -> Value {
    match content {
        Content::Text(text) => json!(text),
        Content::Parts(parts) => {
            let parts: Vec<Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({
                        "type": "text",
                        "text": text,
                    }),
                    ContentPart::ImageUrl { image_url } => json!({
                        "type": "image_url",
                        "image_url": { "url": image_url.url },
                    }),
                    ContentPart::Image { source } => json!({
                        "type": "image_url",
                        "image_url": {
                            "url": format!(
                                "data:{};base64,{}",
                                source.media_type, source.data
                            ),
                        },
                    }),
                })
                .collect();
            json!(parts)
        }
    }
}
