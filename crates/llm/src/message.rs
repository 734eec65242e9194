//! Chat message types shared by all providers.

use serde::{Deserialize, Serialize};

/// The prefix marking a user message as an image-generation directive
/// rather than narratable chat content.
pub const DIRECTIVE_PREFIX: &str = "image::";

/// A message in a conversation.
///
/// `id` is assigned by the conversation utilities, never by providers, and
/// never serialized onto the wire (adapters build their own wire shapes).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Message {
    /// Conversation-unique, monotonically assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The role of the message author.
    pub role: Role,

    /// The message content.
    #[serde(default)]
    pub content: Content,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    /// Create a new user message carrying an image by URL (or data URI).
    pub fn user_image(url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Parts(vec![ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.into() },
            }]),
            ..Default::default()
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    /// Set the identifier, builder style.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// The concatenated text of the message, ignoring image parts.
    pub fn text(&self) -> String {
        match &self.content {
            Content::Text(text) => text.clone(),
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Append streamed text to the message in place.
    ///
    /// Extends the trailing text part, or adds one if the message ends in
    /// an image part.
    pub fn push_text(&mut self, delta: &str) {
        match &mut self.content {
            Content::Text(text) => text.push_str(delta),
            Content::Parts(parts) => match parts.last_mut() {
                Some(ContentPart::Text { text }) => text.push_str(delta),
                _ => parts.push(ContentPart::Text {
                    text: delta.to_owned(),
                }),
            },
        }
    }

    /// Replace the text content, dropping any prior text parts.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = Content::Text(text.into());
    }

    /// Whether the message is an image-generation directive (`image::...`).
    pub fn is_directive(&self) -> bool {
        let text = self.text();
        let trimmed = text.trim();
        trimmed.len() >= DIRECTIVE_PREFIX.len()
            && trimmed.as_bytes()[..DIRECTIVE_PREFIX.len()]
                .eq_ignore_ascii_case(DIRECTIVE_PREFIX.as_bytes())
    }

    /// The prompt carried by an image directive, if the message is one.
    pub fn directive_prompt(&self) -> Option<String> {
        if !self.is_directive() {
            return None;
        }
        let text = self.text();
        Some(text.trim()[DIRECTIVE_PREFIX.len()..].trim().to_owned())
    }

    /// Whether the message carries any image content part.
    pub fn has_image(&self) -> bool {
        match &self.content {
            Content::Text(_) => false,
            Content::Parts(parts) => parts
                .iter()
                .any(|part| !matches!(part, ContentPart::Text { .. })),
        }
    }
}

/// Message content: either plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content.
    Text(String),
    /// Mixed text and image parts.
    Parts(Vec<ContentPart>),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A single content part within a mixed-content message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text {
        /// The text.
        text: String,
    },
    /// An image referenced by URL or data URI (OpenAI wire shape).
    ImageUrl {
        /// The image reference.
        image_url: ImageUrl,
    },
    /// An inline base64 image (Anthropic wire shape).
    Image {
        /// The image bytes and media type.
        source: ImageSource,
    },
}

/// An image reference for `ContentPart::ImageUrl`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageUrl {
    /// URL or `data:` URI of the image.
    pub url: String,
}

/// An inline image source for `ContentPart::Image`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ImageSource {
    /// Source kind, `"base64"`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// MIME type of the encoded image.
    pub media_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageSource {
    /// An inline base64 source.
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source_type: "base64".into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

/// The role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Role {
    /// The user role.
    #[serde(rename = "user")]
    #[default]
    User,
    /// The assistant role.
    #[serde(rename = "assistant")]
    Assistant,
    /// The system role.
    #[serde(rename = "system")]
    System,
}
