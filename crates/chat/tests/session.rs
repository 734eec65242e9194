//! Tests for the session turn state machine.

mod common;

use common::{Call, Script, ScriptedProvider};
use kelp_chat::{AbortController, Session, TurnOutcome, retry};
use llm::{ChatOptions, Message, NoopProvider, Role};
use std::sync::{Arc, Mutex};

fn session(scripts: Vec<Script>) -> (Session<ScriptedProvider>, ScriptedProvider) {
    let provider = ScriptedProvider::new(scripts);
    let session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"));
    (session, provider)
}

#[tokio::test]
async fn a_streaming_turn_appends_the_assistant_message() {
    let (mut session, provider) = session(vec![Script::Stream(vec!["Hel", "lo"])]);
    let mut history = vec![Message::user("hi")];
    let controller = AbortController::new();
    let mut updates = Vec::new();

    let outcome = session
        .turn(&mut history, &controller, |update| {
            updates.push((update.text.to_owned(), update.append));
        })
        .await;

    assert_eq!(outcome, TurnOutcome::Completed("Hello".into()));
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].text(), "Hello");
    // ids were assigned before the call
    assert_eq!(history[0].id, Some(1));
    // first delta opens the bubble, the second appends
    assert_eq!(
        updates,
        vec![("Hel".to_owned(), false), ("lo".to_owned(), true)]
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn a_failed_stream_is_retried_and_the_bubble_reopened() {
    let (mut session, provider) = session(vec![
        Script::StreamThenFail(vec!["par"]),
        Script::Stream(vec!["He", "llo"]),
    ]);
    let mut history = vec![Message::user("hi")];
    let controller = AbortController::new();
    let mut updates = Vec::new();

    let outcome = session
        .turn(&mut history, &controller, |update| {
            updates.push((update.text.to_owned(), update.append));
        })
        .await;

    assert_eq!(outcome, TurnOutcome::Completed("Hello".into()));
    assert_eq!(history.last().map(Message::text).as_deref(), Some("Hello"));
    assert_eq!(provider.call_count(), 2);
    // the partial delta, a reset, then the fresh stream
    assert_eq!(
        updates,
        vec![
            ("par".to_owned(), false),
            (String::new(), false),
            ("He".to_owned(), true),
            ("llo".to_owned(), true),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_resolve_to_the_fallback_message() {
    let notices: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = notices.clone();
    let provider = ScriptedProvider::new(vec![Script::Fail]);
    let mut session = Session::new(provider.clone(), ChatOptions::new("gpt-4o-mini"))
        .with_notices(move |text| sink.lock().unwrap().push(text.to_owned()));
    let mut history = vec![Message::user("hi")];
    let controller = AbortController::new();

    let outcome = session.turn(&mut history, &controller, |_| {}).await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed(retry::CHAT_NETWORK_FALLBACK.into())
    );
    assert_eq!(
        history.last().map(Message::text).as_deref(),
        Some(retry::CHAT_NETWORK_FALLBACK)
    );
    assert_eq!(provider.call_count(), 6);
    assert_eq!(notices.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn an_empty_completion_fails_closed() {
    let (mut session, _provider) = session(vec![Script::Stream(vec![])]);
    let mut history = vec![Message::user("hi")];
    let controller = AbortController::new();

    let outcome = session.turn(&mut history, &controller, |_| {}).await;

    assert_eq!(
        outcome,
        TurnOutcome::Failed(retry::CHAT_EMPTY_FALLBACK.into())
    );
    assert_eq!(
        history.last().map(Message::text).as_deref(),
        Some(retry::CHAT_EMPTY_FALLBACK)
    );
}

#[tokio::test]
async fn a_pre_aborted_turn_never_reaches_the_provider() {
    let mut session = Session::new(NoopProvider, ChatOptions::new("gpt-4o-mini"));
    let mut history = vec![Message::user("hi")];
    let controller = AbortController::new();
    controller.abort();

    let outcome = session.turn(&mut history, &controller, |_| {}).await;

    assert_eq!(outcome, TurnOutcome::Aborted(String::new()));
    // only the id assignment touched the history
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, Some(1));
}

#[tokio::test]
async fn starting_a_new_turn_aborts_the_previous_controller() {
    let (mut session, _provider) = session(vec![Script::Stream(vec!["one"])]);
    let mut history = vec![Message::user("a")];
    let first = AbortController::new();
    session.turn(&mut history, &first, |_| {}).await;
    assert!(!first.is_aborted());

    history.push(Message::user("b"));
    let second = AbortController::new();
    session.turn(&mut history, &second, |_| {}).await;
    assert!(first.is_aborted());
    assert!(!second.is_aborted());
}

#[tokio::test]
async fn an_image_directive_routes_to_generation() {
    let (mut session, provider) = session(vec![Script::Image("https://img.example/fox.png")]);
    let mut history = vec![Message::user("image:: a red fox")];
    let controller = AbortController::new();
    let mut updates = Vec::new();

    let outcome = session
        .turn(&mut history, &controller, |update| {
            updates.push(update.text.to_owned());
        })
        .await;

    let expected = "![generated image](https://img.example/fox.png)";
    assert_eq!(outcome, TurnOutcome::Completed(expected.into()));
    assert_eq!(history.last().map(Message::text).as_deref(), Some(expected));
    assert_eq!(updates, vec![expected.to_owned()]);

    let calls = provider.calls.lock().unwrap();
    let Call::Image { prompt } = &calls[0] else {
        panic!("expected an image call");
    };
    assert_eq!(prompt, "a red fox");
}

#[tokio::test]
async fn a_trailing_image_message_routes_to_vision() {
    let (mut session, provider) = session(vec![Script::Send("a tabby cat on a rug")]);
    let mut image = Message::user_image("https://example.com/cat.png");
    image.push_text("what is this?");
    let mut history = vec![Message::user("hi"), Message::assistant("hello"), image];
    let controller = AbortController::new();

    let outcome = session.turn(&mut history, &controller, |_| {}).await;

    assert_eq!(outcome, TurnOutcome::Completed("a tabby cat on a rug".into()));
    assert_eq!(history.len(), 4);

    let calls = provider.calls.lock().unwrap();
    let Call::Send { messages, .. } = &calls[0] else {
        panic!("expected a non-streaming call");
    };
    assert_eq!(messages.len(), 3);
}

#[tokio::test]
async fn image_exchanges_are_filtered_from_the_next_prompt() {
    let (mut session, provider) = session(vec![Script::Stream(vec!["sure"])]);
    let mut history = vec![
        Message::user("image:: a fox"),
        Message::assistant("![generated image](https://img.example/fox.png)"),
        Message::user("tell me about foxes"),
    ];
    let controller = AbortController::new();

    session.turn(&mut history, &controller, |_| {}).await;

    let calls = provider.calls.lock().unwrap();
    let Call::Stream { messages, .. } = &calls[0] else {
        panic!("expected a stream call");
    };
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "tell me about foxes");
}

#[tokio::test]
async fn narration_speaks_complete_sentences() {
    let spoken: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = spoken.clone();
    let provider = ScriptedProvider::new(vec![Script::Stream(vec!["One. ", "Two"])]);
    let mut session = Session::new(provider, ChatOptions::new("gpt-4o-mini"))
        .with_narrator(move |sentence| sink.lock().unwrap().push(sentence.to_owned()));
    let mut history = vec![Message::user("count")];
    let controller = AbortController::new();

    session.turn(&mut history, &controller, |_| {}).await;

    assert_eq!(spoken.lock().unwrap().as_slice(), ["One.", "Two"]);
}
