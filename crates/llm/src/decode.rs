//! SSE chunk decoding shared by every streaming transport.
//!
//! Network chunks fracture arbitrarily: a JSON event may span two reads,
//! and a read may carry half a UTF-8 codepoint. [`SseDecoder`] buffers raw
//! bytes across `feed` calls and only surfaces complete, stripped lines,
//! so the frames it produces are independent of how the byte stream was
//! split. One malformed line never aborts a stream: [`parse`] logs it and
//! moves on.

use crate::Result;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use std::pin::pin;

/// Anthropic event-type names and keepalives that occasionally arrive as
/// bare tokens rather than inside a data payload.
const CONTROL_TOKENS: &[&str] = &[
    "message_start",
    "content_block_start",
    "content_block_delta",
    "content_block_stop",
    "message_delta",
    "message_stop",
    "ping",
];

/// A decoded frame: one data payload, or the `[DONE]` sentinel.
///
/// `[DONE]` is not valid JSON and must be recognized before any JSON
/// parsing, as a termination signal rather than a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// A complete data payload, stripped of SSE framing.
    Data(String),
    /// The literal `[DONE]` termination sentinel.
    Done,
}

/// Incremental SSE line decoder.
///
/// Holds the unterminated trailing line (as raw bytes) between `feed`
/// calls; `flush` drains it at end-of-stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the frames completed by this chunk in
    /// arrival order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = Self::line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Drain a trailing unterminated line at end-of-stream.
    pub fn flush(&mut self) -> Option<SseFrame> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        Self::line(&line)
    }

    /// Strip SSE framing and control tokens from one line.
    fn line(raw: &str) -> Option<SseFrame> {
        let mut line = raw.trim();
        let bytes = line.as_bytes();
        if bytes.len() >= 5 && bytes[..5].eq_ignore_ascii_case(b"data:") {
            line = line[5..].trim_start();
        }
        if line == "[DONE]" {
            return Some(SseFrame::Done);
        }
        // Comments (": OPENROUTER PROCESSING" keepalives), event-type
        // lines, and bare control tokens carry no payload.
        if line.is_empty()
            || line.starts_with(':')
            || line.starts_with("event:")
            || CONTROL_TOKENS.contains(&line)
        {
            return None;
        }
        Some(SseFrame::Data(line.to_owned()))
    }
}

/// Parse one data payload, skipping (with a log line) anything malformed.
pub fn parse<T: DeserializeOwned>(data: &str) -> Option<T> {
    match serde_json::from_str(data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("failed to parse stream event: {e}, data: {data}");
            None
        }
    }
}

/// Lift a fallible byte stream into a stream of parsed events.
///
/// Terminates at the `[DONE]` sentinel or when the byte stream ends,
/// flushing a trailing unterminated line first.
pub fn decode_stream<B, C, T>(bytes: B) -> impl Stream<Item = Result<T>>
where
    B: Stream<Item = Result<C>>,
    C: AsRef<[u8]>,
    T: DeserializeOwned,
{
    async_stream::try_stream! {
        let mut decoder = SseDecoder::new();
        let mut bytes = pin!(bytes);
        while let Some(next) = bytes.next().await {
            let chunk = next?;
            for frame in decoder.feed(chunk.as_ref()) {
                match frame {
                    SseFrame::Done => return,
                    SseFrame::Data(data) => {
                        if let Some(event) = parse::<T>(&data) {
                            yield event;
                        }
                    }
                }
            }
        }
        if let Some(SseFrame::Data(data)) = decoder.flush()
            && let Some(event) = parse::<T>(&data)
        {
            yield event;
        }
    }
}
