//! LLM trait implementation for the Claude (Anthropic) provider.

use super::{Claude, Event, Request};
use async_stream::try_stream;
use compact_str::CompactString;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{Error, LLM, Message, Response, Result, StreamChunk, decode_stream};
use reqwest::Method;
use std::pin::pin;

/// Raw Anthropic non-streaming response.
#[derive(serde::Deserialize)]
struct AnthropicResponse {
    id: CompactString,
    model: CompactString,
    content: Vec<ContentBlock>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Unknown,
}

impl LLM for Claude {
    type ChatConfig = Request;

    async fn send(&self, req: &Request, messages: &[Message]) -> Result<Response> {
        let body = req.messages(messages);
        tracing::trace!("request: {}", serde_json::to_string(&body)?);
        let response = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::trace!("response: {text}");
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let raw: AnthropicResponse = serde_json::from_str(&text)?;
        Ok(to_response(raw))
    }

    fn stream(
        &self,
        req: Request,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = req.messages(messages).stream();
        if let Ok(body) = serde_json::to_string(&body) {
            tracing::trace!("request: {}", body);
        }
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                Err(Error::Status { status: status.as_u16(), message })?;
                return;
            }
            let bytes = response
                .bytes_stream()
                .map(|next| next.map_err(Error::from));
            let mut events = pin!(decode_stream::<_, _, Event>(bytes));
            while let Some(event) = events.next().await {
                match event? {
                    Event::MessageStop => return,
                    event => {
                        if let Some(chunk) = event.into_chunk() {
                            yield chunk;
                        }
                    }
                }
            }
        }
    }
}

/// Convert an Anthropic response to the unified `Response` format.
fn to_response(raw: AnthropicResponse) -> Response {
    let mut content = String::new();
    for block in raw.content {
        if let ContentBlock::Text { text } = block {
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(&text);
        }
    }

    let mut response = Response::text(content);
    response.meta.id = raw.id;
    response.meta.model = raw.model;
    response.meta.object = "chat.completion".into();
    response
}
