//! Conversation title derivation.
//!
//! Reuses the provider pipeline: a copy of the filtered history gets a
//! synthetic summarize instruction appended and is sent with a low
//! temperature and a small token budget. The result is returned verbatim;
//! callers display it as-is.

use crate::abort::AbortSignal;
use crate::history;
use crate::retry::{self, OpKind, Outcome, RetryState, TITLE_FALLBACK};
use llm::{ChatOptions, LLM, Message};

/// The synthetic instruction appended to the copied history.
pub const TITLE_PROMPT: &str =
    "Summarize our conversation so far in five words or fewer. Reply with only the title.";

/// Derive a short title for the conversation.
///
/// Never fails: network trouble is retried (Title kind, 3 retries) and
/// anything else resolves to the fallback title.
pub async fn derive_title<P: LLM>(
    provider: &P,
    options: &ChatOptions,
    history: &[Message],
    state: &mut RetryState,
    notify: impl FnMut(&str),
) -> String {
    let mut prompt = history::strip_image_exchanges(history);
    prompt.push(Message::user(TITLE_PROMPT));
    let config = P::ChatConfig::from(options.title());
    // Title calls are not tied to a turn; the signal never fires.
    let signal = AbortSignal::default();

    let outcome = retry::run(state, OpKind::Title, &signal, notify, async || {
        let response = provider.send(&config, &prompt).await?;
        match response.content() {
            Some(text) => Ok(text.to_owned()),
            None => Err(llm::Error::Empty),
        }
    })
    .await;

    match outcome {
        Outcome::Done(title) => title,
        Outcome::Cancelled | Outcome::Failed { .. } => TITLE_FALLBACK.to_owned(),
    }
}
