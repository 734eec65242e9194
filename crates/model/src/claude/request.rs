//! Request body for the Anthropic Messages API.

use llm::{ChatOptions, Content, ContentPart, Message, Role};
use serde::Serialize;
use serde_json::{Value, json};

/// Maximum tokens sent when the caller leaves the budget unset; the
/// Messages API requires the field.
const DEFAULT_MAX_TOKENS: usize = 4096;

/// The request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model identifier.
    pub model: String,
    /// Maximum tokens to generate (required by the API).
    pub max_tokens: usize,
    /// System prompt (top-level, not in the messages array).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// The messages array (Anthropic content block format).
    pub messages: Vec<Value>,
    /// Whether to stream the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Top-p sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl Request {
    /// Build the request with the given messages, extracting a leading
    /// system message into the top-level `system` field and converting
    /// the rest to Anthropic content blocks.
    pub fn messages(&self, messages: &[Message]) -> Self {
        let mut system = self.system.clone();
        let mut wire = Vec::new();

        for message in messages {
            match message.role {
                Role::System => {
                    system = Some(message.text());
                }
                Role::User => {
                    wire.push(json!({
                        "role": "user",
                        "content": wire_content(&message.content),
                    }));
                }
                Role::Assistant => {
                    wire.push(json!({
                        "role": "assistant",
                        "content": message.text(),
                    }));
                }
            }
        }

        Self {
            system,
            messages: wire,
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
        Self {
            model: options.model,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: None,
            messages: Vec::new(),
            stream: None,
            temperature: options.temperature,
            top_p: options.top_p,
        }
    }
}

/// Convert message content to Anthropic content blocks.
///
/// URL images map to `url` sources and inline base64 images to `base64`
/// sources, so either part kind can be sent to this provider family.
fn wire_content(content: &Content) -> Value {
    match content {
        Content::Text(text) => json!(text),
        Content::Parts(parts) => {
            let blocks: Vec<Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({
                        "type": "text",
                        "text": text,
                    }),
                    ContentPart::ImageUrl { image_url } => json!({
                        "type": "image",
                        "source": {
                            "type": "url",
                            "url": image_url.url,
                        },
                    }),
                    ContentPart::Image { source } => json!({
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": source.media_type,
                            "data": source.data,
                        },
                    }),
                })
                .collect();
            json!(blocks)
        }
    }
}
