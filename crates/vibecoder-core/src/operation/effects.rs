//! Side channels for operations that do not touch the section list.

use super::model::HeaderPatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A theme, header or slot change collected while a batch is applied.
///
/// Effects are dispatched only after the whole batch has applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffect {
    ThemeUpdated {
        path: String,
        value: Value,
    },
    HeaderUpdated {
        patch: HeaderPatch,
    },
    AssetAssigned {
        slot: String,
        asset_id: String,
        target_id: Option<String>,
    },
}

/// Receiver for side effects, implemented by the theme, header and asset
/// systems that own that state.
pub trait ApplySideEffects: Send + Sync {
    fn update_theme(&self, path: &str, value: &Value);

    fn update_header(&self, patch: &HeaderPatch);

    fn assign_asset(&self, slot: &str, asset_id: &str, target_id: Option<&str>);

    fn dispatch(&self, effect: &SideEffect) {
        match effect {
            SideEffect::ThemeUpdated { path, value } => self.update_theme(path, value),
            SideEffect::HeaderUpdated { patch } => self.update_header(patch),
            SideEffect::AssetAssigned {
                slot,
                asset_id,
                target_id,
            } => self.assign_asset(slot, asset_id, target_id.as_deref()),
        }
    }
}

/// Discards every side effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSideEffects;

impl ApplySideEffects for NoSideEffects {
    fn update_theme(&self, _path: &str, _value: &Value) {}

    fn update_header(&self, _patch: &HeaderPatch) {}

    fn assign_asset(&self, _slot: &str, _asset_id: &str, _target_id: Option<&str>) {}
}
