use serde_json::Value;
use vibecoder_core::operation::{ApplySideEffects, HeaderPatch};

/// Prints side effects to stderr; the CLI owns no theme or header state.
pub struct PrintSideEffects;

impl ApplySideEffects for PrintSideEffects {
    fn update_theme(&self, path: &str, value: &Value) {
        eprintln!("theme: {path} = {value}");
    }

    fn update_header(&self, patch: &HeaderPatch) {
        let json = serde_json::to_string(patch).unwrap_or_else(|_| format!("{patch:?}"));
        eprintln!("header: {json}");
    }

    fn assign_asset(&self, slot: &str, asset_id: &str, target_id: Option<&str>) {
        match target_id {
            Some(target) => eprintln!("asset: {asset_id} -> {slot} ({target})"),
            None => eprintln!("asset: {asset_id} -> {slot}"),
        }
    }
}
