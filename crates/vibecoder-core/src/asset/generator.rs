use super::model::{GeneratedAssetRef, GenerationRequest};
use crate::error::Result;
use async_trait::async_trait;

/// The external asset generation service.
#[async_trait]
pub trait AssetGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAssetRef>;
}
