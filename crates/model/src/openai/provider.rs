//! LLM trait implementation for the OpenAI-compatible provider.

use super::{OpenAI, Request};
use futures_core::Stream;
use llm::{Error, LLM, Message, Response, Result, StreamChunk};
use serde::Deserialize;
use serde_json::json;

/// Image generation response body.
#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

impl LLM for OpenAI {
    type ChatConfig = Request;

    async fn send(&self, req: &Request, messages: &[Message]) -> Result<Response> {
        let body = req.messages(messages);
        self.http.send(&body).await
    }

    fn stream(
        &self,
        req: Request,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = req.messages(messages).stream();
        self.http.stream_sse(&body)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let Some(endpoint) = &self.image_endpoint else {
            return Err(Error::Unsupported("image generation"));
        };
        let body = json!({
            "model": "dall-e-3",
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
        });
        let text = self.http.post(endpoint, &body).await?;
        let response: ImageResponse = serde_json::from_str(&text)?;
        let datum = response.data.into_iter().next().ok_or(Error::Empty)?;
        datum
            .url
            .or_else(|| {
                datum
                    .b64_json
                    .map(|b64| format!("data:image/png;base64,{b64}"))
            })
            .ok_or(Error::Empty)
    }
}
