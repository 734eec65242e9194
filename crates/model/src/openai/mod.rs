//! OpenAI-compatible LLM provider.
//!
//! Covers the hosted OpenAI API, OpenRouter, Ollama, and any other
//! endpoint speaking the chat completions wire format.

use llm::{Client, HttpProvider};
pub use request::Request;

mod provider;
mod request;

/// The OpenAI chat completions endpoint.
pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// The OpenAI image generation endpoint.
pub const IMAGE_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";

/// The OpenRouter chat completions endpoint.
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// The default Ollama chat completions endpoint.
pub const OLLAMA_ENDPOINT: &str = "http://localhost:11434/v1/chat/completions";

/// The OpenAI-compatible LLM provider.
#[derive(Clone)]
pub struct OpenAI {
    /// Shared HTTP transport (headers + chat endpoint).
    http: HttpProvider,
    /// Image generation endpoint, when the backend has one.
    image_endpoint: Option<String>,
}

impl OpenAI {
    /// Create a provider targeting the hosted OpenAI API.
    pub fn api(client: Client, key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpProvider::bearer(client, key, ENDPOINT)?,
            image_endpoint: Some(IMAGE_ENDPOINT.to_owned()),
        })
    }

    /// Create a provider targeting OpenRouter.
    pub fn openrouter(client: Client, key: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpProvider::bearer(client, key, OPENROUTER_ENDPOINT)?,
            image_endpoint: None,
        })
    }

    /// Create a provider targeting a local Ollama instance (no auth).
    pub fn ollama(client: Client) -> Self {
        Self {
            http: HttpProvider::no_auth(client, OLLAMA_ENDPOINT),
            image_endpoint: None,
        }
    }

    /// Create a provider targeting a custom OpenAI-compatible endpoint.
    ///
    /// An empty key skips the Authorization header. If the endpoint ends
    /// in the standard chat completions path, the sibling image path is
    /// derived from it.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> anyhow::Result<Self> {
        let http = if key.is_empty() {
            HttpProvider::no_auth(client, endpoint)
        } else {
            HttpProvider::bearer(client, key, endpoint)?
        };
        let image_endpoint = endpoint
            .strip_suffix("/chat/completions")
            .map(|base| format!("{base}/images/generations"));
        Ok(Self {
            http,
            image_endpoint,
        })
    }

    /// The chat completions endpoint this provider targets.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}
