//! Stream aggregation: one unified chunk stream in, ordered deltas out.

use crate::abort::AbortSignal;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{FinishReason, Result, StreamChunk};
use std::pin::pin;

/// The result of draining one response stream.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Full accumulated text.
    pub text: String,
    /// Finish reason reported by the provider, if it sent one.
    pub reason: Option<FinishReason>,
    /// Whether the abort signal stopped the stream.
    pub aborted: bool,
}

/// Drain a chunk stream, invoking `on_delta` synchronously for every text
/// fragment, strictly in arrival order, exactly once each.
///
/// Exits on natural exhaustion, on a finish-reason-bearing chunk, or when
/// the signal fires. Abort resolves with whatever accumulated so far; it
/// is a graceful stop, not a failure. A transport error mid-stream
/// propagates to the caller (the retry layer re-issues the whole call).
pub async fn aggregate<S>(
    chunks: S,
    signal: &AbortSignal,
    mut on_delta: impl FnMut(&str),
) -> Result<Aggregate>
where
    S: Stream<Item = Result<StreamChunk>>,
{
    let mut chunks = pin!(chunks);
    let mut aggregate = Aggregate::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = signal.cancelled() => {
                aggregate.aborted = true;
                return Ok(aggregate);
            }
            next = chunks.next() => next,
        };
        let Some(chunk) = next else { break };
        let chunk = chunk?;
        if let Some(text) = chunk.content() {
            aggregate.text.push_str(text);
            on_delta(text);
        }
        if let Some(reason) = chunk.reason() {
            aggregate.reason = Some(*reason);
            break;
        }
        // checked again after every event, not only at the pull
        if signal.is_aborted() {
            aggregate.aborted = true;
            break;
        }
    }

    Ok(aggregate)
}
