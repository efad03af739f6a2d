//! Asset request fulfillment and the draft review tray.
//!
//! Requests staged from AI replies are drained one at a time through the
//! external generator. Each success lands in the tray as a draft; a failure
//! is logged and the next request still runs. Drafts leave the tray only by
//! an explicit apply or discard.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use vibecoder_core::asset::{
    AssetGenerator, AssetRequest, AssetStatus, GeneratedAsset, GenerationRequest,
};
use vibecoder_core::{Result, VibeError};

/// Outcome of one [`AssetRequestFulfiller::drain`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainReport {
    pub generated: Vec<GeneratedAsset>,
    /// One message per failed request
    pub failed: Vec<String>,
    /// The same batch was drained before; nothing was generated
    pub skipped_duplicate: bool,
}

#[derive(Default)]
struct FulfillerState {
    pending: Vec<AssetRequest>,
    drained_batches: HashSet<String>,
    tray: Vec<GeneratedAsset>,
    resolved: Vec<GeneratedAsset>,
}

pub struct AssetRequestFulfiller {
    generator: Arc<dyn AssetGenerator>,
    wide_aspect_threshold: f64,
    state: Mutex<FulfillerState>,
}

impl AssetRequestFulfiller {
    pub fn new(generator: Arc<dyn AssetGenerator>, wide_aspect_threshold: f64) -> Self {
        Self {
            generator,
            wide_aspect_threshold,
            state: Mutex::new(FulfillerState::default()),
        }
    }

    /// Queues requests for the next drain.
    pub async fn stage(&self, requests: &[AssetRequest]) {
        if requests.is_empty() {
            return;
        }
        let mut state = self.state.lock().await;
        state.pending.extend_from_slice(requests);
        tracing::debug!(
            target: "vibecoder::assets",
            staged = requests.len(),
            pending = state.pending.len(),
            "Staged asset requests"
        );
    }

    /// Generates every pending request, in order, and empties the queue.
    ///
    /// A batch whose serialized form was drained before is dropped without
    /// calling the generator.
    pub async fn drain(&self, profile_id: &str) -> DrainReport {
        let requests = {
            let mut state = self.state.lock().await;
            let requests = std::mem::take(&mut state.pending);
            if requests.is_empty() {
                return DrainReport::default();
            }
            let key = batch_key(&requests);
            if !state.drained_batches.insert(key) {
                tracing::debug!(target: "vibecoder::assets", "Asset batch already drained");
                return DrainReport {
                    skipped_duplicate: true,
                    ..Default::default()
                };
            }
            requests
        };

        let mut report = DrainReport::default();
        for (index, request) in requests.iter().enumerate() {
            let body =
                GenerationRequest::from_request(profile_id, request, self.wide_aspect_threshold);
            match self.generator.generate(&body).await {
                Ok(generated) => {
                    let draft = GeneratedAsset::draft(generated, &body);
                    self.state.lock().await.tray.push(draft.clone());
                    report.generated.push(draft);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "vibecoder::assets",
                        request = index + 1,
                        asset_type = %body.asset_type,
                        error = %e,
                        "Asset generation failed, continuing with next request"
                    );
                    report
                        .failed
                        .push(format!("request {} ({}): {}", index + 1, body.asset_type, e));
                }
            }
        }

        tracing::info!(
            target: "vibecoder::assets",
            generated = report.generated.len(),
            failed = report.failed.len(),
            "Drained asset requests"
        );
        report
    }

    pub async fn pending(&self) -> Vec<AssetRequest> {
        self.state.lock().await.pending.clone()
    }

    /// Drafts awaiting review, oldest first.
    pub async fn tray(&self) -> Vec<GeneratedAsset> {
        self.state.lock().await.tray.clone()
    }

    /// Drafts that were applied or discarded.
    pub async fn resolved(&self) -> Vec<GeneratedAsset> {
        self.state.lock().await.resolved.clone()
    }

    /// Marks a draft applied and removes it from the tray. Wiring its URL
    /// into a section is up to the caller.
    pub async fn apply(&self, asset_id: &str) -> Result<GeneratedAsset> {
        self.resolve(asset_id, AssetStatus::Applied).await
    }

    /// Marks a draft discarded and removes it from the tray.
    pub async fn discard(&self, asset_id: &str) -> Result<GeneratedAsset> {
        self.resolve(asset_id, AssetStatus::Discarded).await
    }

    /// Drops pending requests without generating them and forgets which
    /// batches were drained, so the same request can be generated again.
    pub async fn clear_pending(&self) {
        let mut state = self.state.lock().await;
        state.pending.clear();
        state.drained_batches.clear();
    }

    async fn resolve(&self, asset_id: &str, status: AssetStatus) -> Result<GeneratedAsset> {
        let mut state = self.state.lock().await;
        let index = state
            .tray
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| VibeError::not_found("asset", asset_id))?;
        let mut asset = state.tray.remove(index);
        asset.status = status;
        state.resolved.push(asset.clone());
        tracing::debug!(target: "vibecoder::assets", asset_id, ?status, "Resolved draft asset");
        Ok(asset)
    }
}

fn batch_key(requests: &[AssetRequest]) -> String {
    serde_json::to_string(requests).unwrap_or_else(|_| format!("{requests:?}"))
}
