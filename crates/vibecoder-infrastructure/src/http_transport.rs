//! HTTP implementation of the AI transport.
//!
//! POSTs the `VibeRequest` as JSON to the configured endpoint and decodes
//! the `VibeResponse` body. The hard timeout belongs to the session, so the
//! client sets none of its own.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use vibecoder_core::config::TransportConfig;
use vibecoder_core::conversation::{TransportError, VibeRequest, VibeResponse, VibeTransport};

/// Longest slice of an error body carried into `TransportError::Failed`.
const ERROR_EXCERPT_CHARS: usize = 200;

#[derive(Clone)]
pub struct HttpVibeTransport {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpVibeTransport {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint)
            .with_context(|| format!("invalid transport endpoint '{endpoint}'"))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &TransportConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .context("transport.endpoint is not set")?;
        Self::new(endpoint, config.api_key.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VibeTransport for HttpVibeTransport {
    async fn send(&self, request: &VibeRequest) -> Result<VibeResponse, TransportError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(target: "vibecoder::transport", error = %e, "AI request failed to send");
            TransportError::Failed(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Failed(format!("failed to read response body: {e}")))?;

        let reply = decode_reply(status, &body);
        match &reply {
            Ok(response) => tracing::debug!(
                target: "vibecoder::transport",
                status,
                operations = response.ops.len(),
                "AI reply received"
            ),
            Err(e) => tracing::warn!(target: "vibecoder::transport", status, error = %e, "AI reply rejected"),
        }
        reply
    }
}

/// Maps a status code plus body to the reply or its error kind.
fn decode_reply(status: u16, body: &str) -> Result<VibeResponse, TransportError> {
    if !(200..300).contains(&status) {
        return Err(TransportError::from_status(status, excerpt(body)));
    }
    serde_json::from_str(body)
        .map_err(|e| TransportError::Failed(format!("malformed reply: {e}")))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(ERROR_EXCERPT_CHARS).collect();
    format!("{cut}...")
}
