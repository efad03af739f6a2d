//! Persistence of the conversation log.

use super::message::{ChatMessage, MessageRole};
use crate::asset::AssetRequest;
use crate::error::Result;
use crate::operation::Operation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One persisted transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub profile_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub asset_requests: Vec<AssetRequest>,
    pub timestamp: String,
    /// Per-profile append counter, assigned by the repository
    #[serde(default)]
    pub sequence: u64,
}

impl ConversationRecord {
    pub fn from_message(profile_id: &str, message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            profile_id: profile_id.to_string(),
            role: message.role,
            content: message.content.clone(),
            operations: message.operations.clone(),
            asset_requests: message.asset_requests.clone(),
            timestamp: message.timestamp.clone(),
            sequence: 0,
        }
    }

    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            timestamp: self.timestamp.clone(),
            sequence: self.sequence,
        }
    }
}

/// Position in the log; pages are fetched strictly before it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageCursor {
    pub timestamp: String,
    pub sequence: u64,
}

/// Append-only conversation log keyed by profile.
#[async_trait]
pub trait ConversationLogRepository: Send + Sync {
    /// Appends `record`, assigning the next sequence number. Returns the
    /// stored record.
    async fn append(&self, record: ConversationRecord) -> Result<ConversationRecord>;

    /// Up to `limit` records older than `before` (the newest ones when
    /// `before` is `None`), returned oldest-first.
    async fn page_before(
        &self,
        profile_id: &str,
        before: Option<&PageCursor>,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>>;

    /// Deletes every record of `profile_id`.
    async fn purge(&self, profile_id: &str) -> Result<()>;
}

/// Page selection shared by repository implementations.
///
/// Timestamps are fixed-width RFC 3339 UTC strings, so comparing them as
/// strings orders them in time; the sequence breaks ties.
pub fn select_page<'a>(
    records: impl IntoIterator<Item = &'a ConversationRecord>,
    before: Option<&PageCursor>,
    limit: usize,
) -> Vec<ConversationRecord> {
    let mut older: Vec<&ConversationRecord> = records
        .into_iter()
        .filter(|r| before.is_none_or(|cursor| r.cursor() < *cursor))
        .collect();
    older.sort_by_key(|r| r.cursor());
    let skip = older.len().saturating_sub(limit);
    older.into_iter().skip(skip).cloned().collect()
}
