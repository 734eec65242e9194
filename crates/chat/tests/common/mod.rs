//! Scripted provider shared by the session and title tests.

#![allow(dead_code)]

use futures_core::Stream;
use llm::{ChatOptions, Error, LLM, Message, Response, Result, StreamChunk};
use std::sync::{Arc, Mutex};

/// One programmed reply per provider call.
///
/// Replies are consumed in order; the last one replays forever so a
/// single `Fail` script models a provider that is down.
#[derive(Clone, Debug)]
pub enum Script {
    /// Stream these text deltas, then end naturally.
    Stream(Vec<&'static str>),
    /// Stream these deltas, then fail with a transient error.
    StreamThenFail(Vec<&'static str>),
    /// Fail the call outright with a transient error.
    Fail,
    /// Resolve a non-streaming call with this text.
    Send(&'static str),
    /// Resolve a non-streaming call with an empty body.
    SendEmpty,
    /// Resolve an image generation with this URL.
    Image(&'static str),
}

/// A recorded provider call.
#[derive(Clone, Debug)]
pub enum Call {
    Stream {
        options: ChatOptions,
        messages: Vec<Message>,
    },
    Send {
        options: ChatOptions,
        messages: Vec<Message>,
    },
    Image {
        prompt: String,
    },
}

/// Replays scripted replies and records every call it receives.
#[derive(Clone)]
pub struct ScriptedProvider {
    scripts: Arc<Mutex<Vec<Script>>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Self {
        assert!(!scripts.is_empty(), "scripted provider needs a script");
        Self {
            scripts: Arc::new(Mutex::new(scripts)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_script(&self) -> Script {
        let mut scripts = self.scripts.lock().unwrap();
        if scripts.len() > 1 {
            scripts.remove(0)
        } else {
            scripts[0].clone()
        }
    }
}

impl LLM for ScriptedProvider {
    type ChatConfig = ChatOptions;

    async fn send(&self, config: &ChatOptions, messages: &[Message]) -> Result<Response> {
        self.calls.lock().unwrap().push(Call::Send {
            options: config.clone(),
            messages: messages.to_vec(),
        });
        match self.next_script() {
            Script::Send(text) => Ok(Response::text(text)),
            Script::SendEmpty => Ok(Response::text("")),
            Script::Fail => Err(Error::Engine("scripted failure".into())),
            other => panic!("unexpected send call for script {other:?}"),
        }
    }

    fn stream(
        &self,
        config: ChatOptions,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        self.calls.lock().unwrap().push(Call::Stream {
            options: config,
            messages: messages.to_vec(),
        });
        let script = self.next_script();
        async_stream::try_stream! {
            match script {
                Script::Stream(deltas) => {
                    for delta in deltas {
                        yield StreamChunk::text(delta);
                    }
                }
                Script::StreamThenFail(deltas) => {
                    for delta in deltas {
                        yield StreamChunk::text(delta);
                    }
                    Err(Error::Engine("scripted stream failure".into()))?;
                }
                Script::Fail => {
                    Err(Error::Engine("scripted failure".into()))?;
                }
                other => panic!("unexpected stream call for script {other:?}"),
            }
        }
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(Call::Image {
            prompt: prompt.to_owned(),
        });
        match self.next_script() {
            Script::Image(url) => Ok(url.to_owned()),
            Script::Fail => Err(Error::Engine("scripted failure".into())),
            other => panic!("unexpected image call for script {other:?}"),
        }
    }
}
