//! Kelp chat core.
//!
//! Streaming aggregation, retry/cancellation, and conversation-continuity
//! semantics over any [`llm::LLM`] provider. The UI, persistence, and
//! text-to-speech layers are collaborators: this crate consumes history
//! snapshots and caller-supplied abort controllers, and drives callbacks.

pub use abort::{AbortController, AbortSignal, TurnGate};
pub use history::{Conversation, assign_ids, remove_exchange, strip_image_exchanges};
pub use retry::{OpKind, Outcome, RETRY_DELAY, RetryState};
pub use session::{Session, TurnOutcome, Update};
pub use speech::{Narrator, SentenceSplitter};
pub use stream::{Aggregate, aggregate};
pub use title::{TITLE_PROMPT, derive_title};

mod abort;
mod history;
pub mod retry;
mod session;
mod speech;
mod stream;
mod title;
