//! Chat session: the per-turn state machine.
//!
//! A turn moves `Sending -> Streaming -> Completed | Aborted | Failed`.
//! The trailing assistant message is created on the first delta and
//! appended to in place while the stream arrives; failed turns resolve to
//! a fallback message in the transcript, aborted turns keep the partial
//! text. Routing is decided once per turn: an `image::` directive goes to
//! image generation, a trailing user message with image parts goes to the
//! non-streaming vision call, everything else streams.

use crate::abort::{AbortController, AbortSignal, TurnGate};
use crate::history;
use crate::retry::{self, CHAT_EMPTY_FALLBACK, OpKind, Outcome, RetryState};
use crate::speech::Narrator;
use crate::stream::aggregate;
use crate::title;
use llm::{ChatOptions, LLM, Message, Role};

/// A UI update pushed for every streamed fragment or terminal message.
#[derive(Debug, Clone, Copy)]
pub struct Update<'a> {
    /// The text fragment, or the full replacement text when `append` is
    /// false.
    pub text: &'a str,
    /// Append to the open assistant message instead of starting one.
    pub append: bool,
    /// Whether the view should keep following the tail.
    pub scroll: bool,
}

/// How a turn resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The call completed; the final assistant text is attached.
    Completed(String),
    /// The turn was aborted; whatever streamed in is preserved.
    Aborted(String),
    /// The call failed; the fallback text was appended to the history.
    Failed(String),
}

/// Turn phase: `Sending` until the first delta opens the assistant
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sending,
    Streaming,
}

type NoticeHook = Option<Box<dyn FnMut(&str) + Send>>;

/// A chat session over one provider.
///
/// Owns the retry counters and the turn gate; consumes history snapshots
/// supplied by the caller and returns them updated through `&mut`.
pub struct Session<P: LLM> {
    provider: P,
    options: ChatOptions,
    retry: RetryState,
    gate: TurnGate,
    narrator: Option<Narrator>,
    on_notice: NoticeHook,
}

impl<P: LLM> Session<P> {
    /// Create a session over a provider.
    pub fn new(provider: P, options: ChatOptions) -> Self {
        Self {
            provider,
            options,
            retry: RetryState::new(),
            gate: TurnGate::default(),
            narrator: None,
            on_notice: None,
        }
    }

    /// Narrate streamed responses sentence-by-sentence to `speak`.
    pub fn with_narrator(mut self, speak: impl FnMut(&str) + Send + 'static) -> Self {
        self.narrator = Some(Narrator::new(speak));
        self
    }

    /// Surface transient notifications (e.g. exhausted retries) to the
    /// given hook instead of the log.
    pub fn with_notices(mut self, notice: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_notice = Some(Box::new(notice));
        self
    }

    /// The options used for every call.
    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    /// Abort the active turn, if any.
    pub fn abort(&mut self) {
        self.gate.abort_active();
    }

    /// Run one conversation turn over the supplied history.
    ///
    /// Adopts `controller` as the turn's cancellation source, aborting
    /// the previous turn's controller first; this is the only cross-turn
    /// coordination, and it is what keeps a single mutator on the
    /// history.
    pub async fn turn(
        &mut self,
        history: &mut Vec<Message>,
        controller: &AbortController,
        mut on_update: impl FnMut(Update<'_>),
    ) -> TurnOutcome {
        let signal = self.gate.adopt(controller);
        history::assign_ids(history);
        let prompt = history::strip_image_exchanges(history);
        tracing::debug!(messages = prompt.len(), "turn: sending");

        let image_prompt = history
            .last()
            .filter(|m| m.role == Role::User)
            .and_then(|m| m.directive_prompt());
        if let Some(image_prompt) = image_prompt {
            return self
                .image_turn(history, &image_prompt, &signal, &mut on_update)
                .await;
        }

        if history
            .last()
            .is_some_and(|m| m.role == Role::User && m.has_image())
        {
            return self.vision_turn(history, prompt, &signal, &mut on_update).await;
        }

        self.chat_turn(history, prompt, &signal, &mut on_update).await
    }

    /// Derive a short title for the conversation.
    pub async fn title(&mut self, history: &[Message]) -> String {
        let notice = &mut self.on_notice;
        title::derive_title(
            &self.provider,
            &self.options,
            history,
            &mut self.retry,
            |text| notify(notice, text),
        )
        .await
    }

    /// The streaming chat path.
    async fn chat_turn(
        &mut self,
        history: &mut Vec<Message>,
        prompt: Vec<Message>,
        signal: &AbortSignal,
        on_update: &mut impl FnMut(Update<'_>),
    ) -> TurnOutcome {
        let mut phase = Phase::Sending;
        let provider = self.provider.clone();
        let options = self.options.clone();
        let narrator = &mut self.narrator;
        let notice = &mut self.on_notice;

        let outcome = retry::run(
            &mut self.retry,
            OpKind::Chat,
            signal,
            |text| notify(notice, text),
            async || {
                if phase == Phase::Streaming {
                    // a retried attempt reopens the assistant bubble
                    if let Some(last) = history.last_mut() {
                        last.set_text("");
                    }
                    if let Some(narrator) = narrator.as_mut() {
                        narrator.reset();
                    }
                    on_update(Update {
                        text: "",
                        append: false,
                        scroll: false,
                    });
                }
                let config = P::ChatConfig::from(options.clone());
                aggregate(provider.stream(config, &prompt), signal, |delta| {
                    if phase == Phase::Sending {
                        history.push(Message::assistant(""));
                        phase = Phase::Streaming;
                        tracing::debug!("turn: streaming");
                        on_update(Update {
                            text: delta,
                            append: false,
                            scroll: true,
                        });
                    } else {
                        on_update(Update {
                            text: delta,
                            append: true,
                            scroll: true,
                        });
                    }
                    if let Some(last) = history.last_mut() {
                        last.push_text(delta);
                    }
                    if let Some(narrator) = narrator.as_mut() {
                        narrator.push(delta);
                    }
                })
                .await
            },
        )
        .await;

        match outcome {
            Outcome::Done(done) if done.aborted => {
                tracing::debug!("turn: aborted");
                if let Some(narrator) = self.narrator.as_mut() {
                    narrator.flush();
                }
                TurnOutcome::Aborted(done.text)
            }
            Outcome::Done(done) => {
                if done.text.is_empty() {
                    // completed with nothing, e.g. a content-filter stop
                    tracing::debug!(reason = ?done.reason, "turn: empty completion");
                    apply_failure(history, phase, CHAT_EMPTY_FALLBACK, on_update);
                    return TurnOutcome::Failed(CHAT_EMPTY_FALLBACK.to_owned());
                }
                tracing::debug!("turn: completed");
                if let Some(narrator) = self.narrator.as_mut() {
                    narrator.flush();
                }
                TurnOutcome::Completed(done.text)
            }
            Outcome::Cancelled => {
                tracing::debug!("turn: aborted");
                let partial = match phase {
                    Phase::Streaming => history.last().map(|m| m.text()).unwrap_or_default(),
                    Phase::Sending => String::new(),
                };
                TurnOutcome::Aborted(partial)
            }
            Outcome::Failed { message } => {
                tracing::debug!("turn: failed");
                apply_failure(history, phase, &message, on_update);
                TurnOutcome::Failed(message)
            }
        }
    }

    /// The non-streaming vision path.
    async fn vision_turn(
        &mut self,
        history: &mut Vec<Message>,
        prompt: Vec<Message>,
        signal: &AbortSignal,
        on_update: &mut impl FnMut(Update<'_>),
    ) -> TurnOutcome {
        tracing::debug!("turn: vision");
        let provider = self.provider.clone();
        let options = self.options.clone();
        let notice = &mut self.on_notice;

        let outcome = retry::run(
            &mut self.retry,
            OpKind::Vision,
            signal,
            |text| notify(notice, text),
            async || {
                let config = P::ChatConfig::from(options.clone());
                let response = provider.send(&config, &prompt).await?;
                match response.content() {
                    Some(text) => Ok(text.to_owned()),
                    None => Err(llm::Error::Empty),
                }
            },
        )
        .await;

        match outcome {
            Outcome::Done(text) => {
                history.push(Message::assistant(text.clone()));
                on_update(Update {
                    text: &text,
                    append: false,
                    scroll: true,
                });
                TurnOutcome::Completed(text)
            }
            Outcome::Cancelled => TurnOutcome::Aborted(String::new()),
            Outcome::Failed { message } => {
                apply_failure(history, Phase::Sending, &message, on_update);
                TurnOutcome::Failed(message)
            }
        }
    }

    /// The image-generation path for `image::` directives.
    async fn image_turn(
        &mut self,
        history: &mut Vec<Message>,
        image_prompt: &str,
        signal: &AbortSignal,
        on_update: &mut impl FnMut(Update<'_>),
    ) -> TurnOutcome {
        tracing::debug!("turn: image generation");
        let provider = self.provider.clone();
        let notice = &mut self.on_notice;

        let outcome = retry::run(
            &mut self.retry,
            OpKind::Image,
            signal,
            |text| notify(notice, text),
            async || provider.generate_image(image_prompt).await,
        )
        .await;

        match outcome {
            Outcome::Done(url) => {
                let text = format!("![generated image]({url})");
                history.push(Message::assistant(text.clone()));
                on_update(Update {
                    text: &text,
                    append: false,
                    scroll: true,
                });
                TurnOutcome::Completed(text)
            }
            Outcome::Cancelled => TurnOutcome::Aborted(String::new()),
            Outcome::Failed { message } => {
                apply_failure(history, Phase::Sending, &message, on_update);
                TurnOutcome::Failed(message)
            }
        }
    }
}

/// Resolve a failed call into the transcript: replace the partially
/// streamed tail, or append a fresh assistant message.
fn apply_failure(
    history: &mut Vec<Message>,
    phase: Phase,
    message: &str,
    on_update: &mut impl FnMut(Update<'_>),
) {
    match phase {
        Phase::Streaming => {
            if let Some(last) = history.last_mut() {
                last.set_text(message);
            }
        }
        Phase::Sending => history.push(Message::assistant(message)),
    }
    on_update(Update {
        text: message,
        append: false,
        scroll: true,
    });
}

/// Route a transient notification to the hook, or the log without one.
fn notify(hook: &mut NoticeHook, text: &str) {
    match hook {
        Some(hook) => hook(text),
        None => tracing::warn!("{text}"),
    }
}
