//! HTTP implementation of the asset generation service.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use vibecoder_core::asset::{AssetGenerator, GeneratedAssetRef, GenerationRequest};
use vibecoder_core::config::TransportConfig;
use vibecoder_core::{Result, VibeError};

#[derive(Clone)]
pub struct HttpAssetGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAssetGenerator {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let endpoint = endpoint.into();
        reqwest::Url::parse(&endpoint)
            .with_context(|| format!("invalid asset endpoint '{endpoint}'"))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &TransportConfig) -> anyhow::Result<Self> {
        let endpoint = config
            .asset_endpoint
            .as_deref()
            .context("transport.asset_endpoint is not set")?;
        Self::new(endpoint, config.api_key.clone())
    }
}

#[async_trait]
impl AssetGenerator for HttpAssetGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAssetRef> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| VibeError::asset(format!("asset request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VibeError::asset(format!(
                "asset service error ({status}): {error_text}"
            )));
        }

        let generated: GeneratedAssetRef = response
            .json()
            .await
            .map_err(|e| VibeError::asset(format!("failed to parse asset response: {e}")))?;
        tracing::debug!(
            target: "vibecoder::assets",
            asset_id = %generated.id,
            asset_type = %request.asset_type,
            "Asset generated"
        );
        Ok(generated)
    }
}
