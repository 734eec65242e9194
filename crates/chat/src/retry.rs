//! Retry policy around provider calls.
//!
//! Fixed delay, no backoff. Counters live in explicit [`RetryState`],
//! keyed per operation kind, so one operation's failures never bleed into
//! another's and the policy is testable in isolation. Every outcome
//! resolves; a modeled failure becomes a human-readable fallback string,
//! never an unhandled rejection.

use crate::abort::AbortSignal;
use llm::{Error, Result};
use std::collections::BTreeMap;
use std::time::Duration;

/// Delay between attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Fallback chat text when the provider cannot be reached.
pub const CHAT_NETWORK_FALLBACK: &str =
    "I could not reach the model provider. Check your connection and provider settings, then try again.";

/// Fallback chat text when the provider answered with nothing.
pub const CHAT_EMPTY_FALLBACK: &str =
    "The model returned an empty response. Try again or rephrase your message.";

/// Fallback text when vision analysis cannot be reached.
pub const VISION_NETWORK_FALLBACK: &str =
    "I could not reach the vision service. Please try again.";

/// Fallback text when the model could not read the image.
pub const VISION_EMPTY_FALLBACK: &str = "I could not read anything from that image.";

/// Fallback text when image generation failed.
pub const IMAGE_FALLBACK: &str = "Image generation failed. Please try again.";

/// Fallback text when the active provider cannot generate images.
pub const IMAGE_UNSUPPORTED_FALLBACK: &str =
    "The current provider does not support image generation.";

/// Fallback conversation title.
pub const TITLE_FALLBACK: &str = "New conversation";

/// The kinds of provider operations, each with its own retry counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpKind {
    /// Streaming chat completion.
    Chat,
    /// Non-streaming vision analysis.
    Vision,
    /// Title summarization.
    Title,
    /// Image generation.
    Image,
}

impl OpKind {
    /// Operation name for logs and notifications.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chat => "chat completion",
            Self::Vision => "vision analysis",
            Self::Title => "title summarization",
            Self::Image => "image generation",
        }
    }

    /// Retries allowed after the initial attempt.
    pub fn max_retries(self) -> u32 {
        match self {
            Self::Title => 3,
            Self::Chat | Self::Vision | Self::Image => 5,
        }
    }

    /// The assistant-facing fallback text for a failure of this kind.
    ///
    /// Semantic failures get a different string than network ones, so
    /// the transcript tells the user which happened.
    pub fn fallback(self, error: &Error) -> &'static str {
        if matches!(error, Error::Unsupported(_)) && self == Self::Image {
            return IMAGE_UNSUPPORTED_FALLBACK;
        }
        match (self, error.transient()) {
            (Self::Chat, true) => CHAT_NETWORK_FALLBACK,
            (Self::Chat, false) => CHAT_EMPTY_FALLBACK,
            (Self::Vision, true) => VISION_NETWORK_FALLBACK,
            (Self::Vision, false) => VISION_EMPTY_FALLBACK,
            (Self::Title, _) => TITLE_FALLBACK,
            (Self::Image, _) => IMAGE_FALLBACK,
        }
    }
}

/// Per-kind attempt counters.
#[derive(Debug, Default)]
pub struct RetryState {
    counts: BTreeMap<OpKind, u32>,
}

impl RetryState {
    /// Create a fresh state with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current failure count for a kind.
    pub fn count(&self, kind: OpKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    fn bump(&mut self, kind: OpKind) -> u32 {
        let count = self.counts.entry(kind).or_default();
        *count += 1;
        *count
    }

    fn reset(&mut self, kind: OpKind) {
        self.counts.remove(&kind);
    }
}

/// How a wrapped operation resolved.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation succeeded (possibly after retries).
    Done(T),
    /// The abort signal fired; no further attempts were made.
    Cancelled,
    /// Retries were exhausted or the failure was not retryable.
    Failed {
        /// The fallback text the caller should surface.
        message: String,
    },
}

/// Drive `op` under the retry policy for `kind`.
///
/// Transient failures are retried up to the kind's maximum with a fixed
/// [`RETRY_DELAY`] between attempts; semantic failures resolve
/// immediately. The counter resets on success and on exhaustion.
/// Cancellation short-circuits before an attempt, mid-attempt (the
/// in-flight future is dropped), and during the delay. Exhaustion also
/// surfaces a transient notification through `notify`.
pub async fn run<T>(
    state: &mut RetryState,
    kind: OpKind,
    signal: &AbortSignal,
    mut notify: impl FnMut(&str),
    mut op: impl AsyncFnMut() -> Result<T>,
) -> Outcome<T> {
    loop {
        if signal.is_aborted() {
            return Outcome::Cancelled;
        }
        let attempt = tokio::select! {
            biased;
            _ = signal.cancelled() => return Outcome::Cancelled,
            result = op() => result,
        };
        match attempt {
            Ok(value) => {
                state.reset(kind);
                return Outcome::Done(value);
            }
            Err(error) if !error.transient() => {
                tracing::warn!(op = kind.name(), %error, "provider call failed");
                state.reset(kind);
                return Outcome::Failed {
                    message: kind.fallback(&error).to_owned(),
                };
            }
            Err(error) => {
                let failures = state.bump(kind);
                if failures > kind.max_retries() {
                    tracing::warn!(
                        op = kind.name(),
                        failures,
                        %error,
                        "provider call failed; retries exhausted"
                    );
                    notify(&format!("{} failed after {failures} attempts", kind.name()));
                    state.reset(kind);
                    return Outcome::Failed {
                        message: kind.fallback(&error).to_owned(),
                    };
                }
                tracing::warn!(
                    op = kind.name(),
                    attempt = failures,
                    %error,
                    "provider call failed; retrying"
                );
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => return Outcome::Cancelled,
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }
}
