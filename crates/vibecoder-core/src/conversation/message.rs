use super::repository::ConversationRecord;
use super::transport::TransportError;
use crate::asset::AssetRequest;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Lifecycle of a message. Only assistant messages carrying operations are
/// ever `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFeedback {
    Up,
    Down,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_requests: Vec<AssetRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_notes: Vec<String>,
    pub timestamp: String,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<MessageFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<u32>,
    /// Set on the reply that reports a failed transport call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TransportError>,
}

impl ChatMessage {
    fn base(role: MessageRole, content: String, status: MessageStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            operations: Vec::new(),
            asset_requests: Vec::new(),
            preview_notes: Vec::new(),
            timestamp: crate::now_timestamp(),
            status,
            feedback: None,
            latency_ms: None,
            credits_used: None,
            error: None,
        }
    }

    /// A user message; terminal as soon as it exists.
    pub fn user(content: impl Into<String>) -> Self {
        Self::base(MessageRole::User, content.into(), MessageStatus::Applied)
    }

    /// An assistant reply. Pending while it carries operations to apply.
    pub fn assistant(
        content: impl Into<String>,
        operations: Vec<Operation>,
        asset_requests: Vec<AssetRequest>,
    ) -> Self {
        let status = if operations.is_empty() {
            MessageStatus::Applied
        } else {
            MessageStatus::Pending
        };
        let mut message = Self::base(MessageRole::Assistant, content.into(), status);
        message.operations = operations;
        message.asset_requests = asset_requests;
        message
    }

    /// Terminal assistant reply describing a transport failure.
    pub fn transport_failure(error: TransportError) -> Self {
        let mut message = Self::base(
            MessageRole::Assistant,
            error.user_message().to_string(),
            MessageStatus::Applied,
        );
        message.error = Some(error);
        message
    }

    /// Rebuilds a message from the persisted log. Loaded messages are terminal.
    pub fn from_record(record: &ConversationRecord) -> Self {
        Self {
            id: record.id.clone(),
            role: record.role,
            content: record.content.clone(),
            operations: record.operations.clone(),
            asset_requests: record.asset_requests.clone(),
            preview_notes: Vec::new(),
            timestamp: record.timestamp.clone(),
            status: MessageStatus::Applied,
            feedback: None,
            latency_ms: None,
            credits_used: None,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}
