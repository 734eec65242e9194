//! Configuration for a chat call.

use serde::{Deserialize, Serialize};

/// Provider-agnostic sampling options for a single call.
///
/// Each provider converts this into its own wire request via `From`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatOptions {
    /// The model to use.
    pub model: String,

    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Top-p sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Effort hint for reasoning-tier models. Ignored by providers that
    /// have no such notion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

impl ChatOptions {
    /// Create options for the given model with no sampling overrides.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            reasoning_effort: None,
        }
    }

    /// The preset used for title summarization: low temperature, small
    /// token budget, same model.
    pub fn title(&self) -> Self {
        Self {
            model: self.model.clone(),
            temperature: Some(0.2),
            max_tokens: Some(24),
            top_p: None,
            reasoning_effort: self.reasoning_effort.clone(),
        }
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: Some(0.7),
            max_tokens: None,
            top_p: None,
            reasoning_effort: None,
        }
    }
}
