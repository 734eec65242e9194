//! Shared HTTP transport for OpenAI-compatible LLM providers.
//!
//! `HttpProvider` wraps a `reqwest::Client` with pre-configured headers and
//! endpoint URL. Provides `send()` for non-streaming and `stream_sse()` for
//! Server-Sent Events streaming. Used by every OpenAI-compatible backend;
//! the Anthropic adapter keeps its own transport (different SSE format)
//! but shares the same [`SseDecoder`](crate::SseDecoder).

use crate::{Error, Response, Result, StreamChunk, decode};
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client, Method,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use std::pin::pin;

/// Shared HTTP transport for OpenAI-compatible providers.
///
/// Holds a `reqwest::Client`, pre-built headers (auth + content-type),
/// and the target endpoint URL.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Create a provider with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> anyhow::Result<Self> {
        let mut headers = base_headers();
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Create a provider without authentication (e.g. a local endpoint).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            headers: base_headers(),
            endpoint: endpoint.to_owned(),
        }
    }

    /// Create a provider with a custom header for authentication.
    ///
    /// Used by providers that don't use Bearer tokens (e.g. Anthropic
    /// uses `x-api-key`).
    pub fn custom_header(
        client: Client,
        header_name: &str,
        header_value: &str,
        endpoint: &str,
    ) -> anyhow::Result<Self> {
        let mut headers = base_headers();
        headers.insert(
            header_name.parse::<HeaderName>()?,
            header_value.parse::<HeaderValue>()?,
        );
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Send a non-streaming request and deserialize the response as JSON.
    ///
    /// A non-success status fails closed as [`Error::Status`] with the
    /// body attached verbatim.
    pub async fn send(&self, body: &impl Serialize) -> Result<Response> {
        let text = self.post(&self.endpoint, body).await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    /// POST a JSON body and return the raw response text.
    pub async fn post(&self, endpoint: &str, body: &impl Serialize) -> Result<String> {
        tracing::trace!("request: {}", serde_json::to_string(body)?);
        let response = self
            .client
            .request(Method::POST, endpoint)
            .headers(self.headers.clone())
            .json(body)
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
        Ok(text)
    }

    /// Stream an SSE response (OpenAI-compatible format).
    ///
    /// Decodes `data: ` framed lines through [`SseDecoder`](crate::SseDecoder),
    /// stops at the `[DONE]` sentinel, and deserializes each payload as
    /// [`StreamChunk`]. Malformed payloads are skipped, not fatal.
    pub fn stream_sse<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> impl Stream<Item = Result<StreamChunk>> + Send + use<B> {
        if let Ok(body) = serde_json::to_string(body) {
            tracing::trace!("request: {}", body);
        }
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(body);

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                Err(Error::Status { status: status.as_u16(), message })?;
                return;
            }
            let bytes = response.bytes_stream().map(|next| next.map_err(Error::from));
            let mut chunks = pin!(decode::decode_stream::<_, _, StreamChunk>(bytes));
            while let Some(chunk) = chunks.next().await {
                yield chunk?;
            }
        }
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
