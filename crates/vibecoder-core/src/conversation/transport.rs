//! Contract of the external AI transport.
//!
//! The transport is a black box: it receives the user text plus a snapshot of
//! the editor state and returns a reply with an operation batch.

use crate::asset::AssetRequest;
use crate::catalog::SupportedSectionType;
use crate::operation::Operation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Transport failure kinds, mapped from the status-like signal of the call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransportError {
    #[error("rate limited")]
    RateLimited,

    #[error("payment required")]
    PaymentRequired,

    #[error("request failed: {0}")]
    Failed(String),

    #[error("no response within {seconds}s")]
    Timeout { seconds: u64 },
}

impl TransportError {
    /// Maps an HTTP-like status code to an error kind.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::PaymentRequired,
            _ => Self::Failed(format!("status {status}: {}", detail.into())),
        }
    }

    /// Plain-language text shown as the assistant reply.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimited => "Too many requests right now. Please wait a moment and try again.",
            Self::PaymentRequired => {
                "You're out of AI credits. Top up your balance to keep editing with the assistant."
            }
            Self::Failed(_) => "Something went wrong talking to the assistant. Please try again.",
            Self::Timeout { .. } => {
                "The assistant took too long to respond. Please try again."
            }
        }
    }
}

/// One prior turn sent as conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

/// Section as the AI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: String,
    pub content: Map<String, Value>,
    pub style_options: Map<String, Value>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub vibe_tags: Vec<String>,
    #[serde(default)]
    pub font_preference: Option<String>,
}

/// Editor state snapshot sent with every message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeContext {
    pub sections: Vec<SectionSummary>,
    pub supported_section_types: Vec<SupportedSectionType>,
    pub brand_profile: Option<BrandProfile>,
    pub conversation_history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeRequest {
    pub message: String,
    pub context: VibeContext,
    pub profile_id: String,
}

/// Structured reply of the AI.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VibeResponse {
    pub message: String,
    #[serde(default)]
    pub ops: Vec<Operation>,
    #[serde(default, deserialize_with = "crate::asset::lenient_asset_requests")]
    pub asset_requests: Vec<AssetRequest>,
    #[serde(default)]
    pub preview_notes: Vec<String>,
    #[serde(default, alias = "creditsUsed", skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<u32>,
}

/// The AI call. Implementations never time out on their own; the session
/// wraps every call in its hard timeout.
#[async_trait]
pub trait VibeTransport: Send + Sync {
    async fn send(&self, request: &VibeRequest) -> Result<VibeResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(TransportError::from_status(429, ""), TransportError::RateLimited);
        assert_eq!(
            TransportError::from_status(402, ""),
            TransportError::PaymentRequired
        );
        assert!(matches!(
            TransportError::from_status(500, "boom"),
            TransportError::Failed(ref m) if m.contains("boom")
        ));
    }

    #[test]
    fn test_response_optional_fields_default() {
        let response: VibeResponse = serde_json::from_value(json!({
            "message": "Added a FAQ",
            "ops": [{"type": "removeSection", "sectionId": "a"}]
        }))
        .unwrap();

        assert_eq!(response.ops.len(), 1);
        assert!(response.asset_requests.is_empty());
        assert!(response.credits_used.is_none());
    }

    #[test]
    fn test_unknown_asset_kind_keeps_the_rest_of_the_reply() {
        let response: VibeResponse = serde_json::from_value(json!({
            "message": "Added a hero",
            "ops": [{"type": "addSection", "section": {"section_type": "hero"}}],
            "asset_requests": [
                {"type": "banner", "prompt": "sunset"},
                {"type": "image", "prompt": "pottery", "aspect": "16:9"}
            ]
        }))
        .unwrap();

        assert_eq!(response.ops.len(), 1);
        assert_eq!(response.asset_requests.len(), 1);
        assert_eq!(response.asset_requests[0].prompt, "pottery");

        let null_requests: VibeResponse =
            serde_json::from_value(json!({"message": "ok", "asset_requests": null})).unwrap();
        assert!(null_requests.asset_requests.is_empty());
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let value = serde_json::to_value(TransportError::Timeout { seconds: 60 }).unwrap();
        assert_eq!(value["kind"], "timeout");
        assert_eq!(value["detail"]["seconds"], 60);
    }
}
