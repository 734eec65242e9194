//! Tests for title derivation.

mod common;

use common::{Call, Script, ScriptedProvider};
use kelp_chat::{Session, TITLE_PROMPT, retry};
use llm::{ChatOptions, Message};

#[tokio::test]
async fn the_title_comes_back_verbatim() {
    let provider = ScriptedProvider::new(vec![Script::Send("  Rust Chat Basics\n")]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));
    let history = vec![Message::user("how do I learn rust?"), Message::assistant("start with the book")];

    let title = session.title(&history).await;

    // no trimming, no post-processing
    assert_eq!(title, "  Rust Chat Basics\n");
    // the original history is untouched by the synthetic instruction
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn the_summarize_instruction_is_appended_to_a_copy() {
    let provider = ScriptedProvider::new(vec![Script::Send("Learning Rust")]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));
    let history = vec![Message::user("hello")];

    session.title(&history).await;

    let calls = provider.calls.lock().unwrap();
    let Call::Send { options, messages } = &calls[0] else {
        panic!("expected a non-streaming call");
    };
    assert_eq!(messages.len(), 2);
    assert_eq!(messages.last().map(Message::text).as_deref(), Some(TITLE_PROMPT));
    // the low-temperature, small-budget preset
    assert_eq!(options.temperature, Some(0.2));
    assert_eq!(options.max_tokens, Some(24));
}

#[tokio::test]
async fn an_empty_summary_falls_back_without_retrying() {
    let provider = ScriptedProvider::new(vec![Script::SendEmpty]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));

    let title = session.title(&[Message::user("hi")]).await;

    assert_eq!(title, retry::TITLE_FALLBACK);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn network_failures_are_retried_then_fall_back() {
    let provider = ScriptedProvider::new(vec![Script::Fail]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));

    let title = session.title(&[Message::user("hi")]).await;

    assert_eq!(title, retry::TITLE_FALLBACK);
    // initial attempt + 3 retries
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn directives_are_filtered_before_summarizing() {
    let provider = ScriptedProvider::new(vec![Script::Send("Foxes")]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));
    let history = vec![
        Message::user("image:: a fox"),
        Message::assistant("![generated image](https://img.example/fox.png)"),
        Message::user("tell me about foxes"),
    ];

    session.title(&history).await;

    let calls = provider.calls.lock().unwrap();
    let Call::Send { messages, .. } = &calls[0] else {
        panic!("expected a non-streaming call");
    };
    // the filtered message plus the synthetic instruction
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text(), "tell me about foxes");
}
