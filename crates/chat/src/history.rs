//! Conversation history utilities.
//!
//! Pure functions over message snapshots; any persistence layer can wrap
//! them. The core never owns conversation storage.

use llm::{Message, Role};
use serde::{Deserialize, Serialize};

/// A conversation as the persistence collaborator stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable conversation identifier.
    pub id: u64,
    /// Display title, usually derived by summarization.
    #[serde(default)]
    pub title: String,
    /// Ordered message history.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: String::new(),
            messages: Vec::new(),
        }
    }
}

/// Assign strictly increasing ids to messages that lack one.
///
/// Existing ids are preserved; the counter starts past the current
/// maximum (missing ids count as 0). Idempotent.
pub fn assign_ids(history: &mut [Message]) {
    let mut next = history.iter().filter_map(|m| m.id).max().unwrap_or(0);
    for message in history.iter_mut() {
        if message.id.is_none() {
            next += 1;
            message.id = Some(next);
        }
    }
}

/// Remove image-generation exchanges before a history is sent to a
/// provider: each `image::` directive message and the generated-result
/// message immediately after it.
///
/// One pass with a single-slot "was the previous message a directive"
/// state, updated on every iteration whether or not the current message
/// is kept. A trailing directive with no follow-up is removed alone.
pub fn strip_image_exchanges(history: &[Message]) -> Vec<Message> {
    let mut kept = Vec::with_capacity(history.len());
    let mut after_directive = false;
    for message in history {
        let directive = message.is_directive();
        if !directive && !after_directive {
            kept.push(message.clone());
        }
        after_directive = directive;
    }
    kept
}

/// Delete a user message and its immediately following assistant reply
/// together, by the user message's id.
pub fn remove_exchange(history: &mut Vec<Message>, user_id: u64) {
    let Some(pos) = history
        .iter()
        .position(|m| m.id == Some(user_id) && m.role == Role::User)
    else {
        return;
    };
    if history
        .get(pos + 1)
        .is_some_and(|m| m.role == Role::Assistant)
    {
        history.remove(pos + 1);
    }
    history.remove(pos);
}
