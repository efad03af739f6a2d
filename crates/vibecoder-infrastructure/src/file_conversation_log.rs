//! File-based conversation log.
//!
//! Each profile's log is one JSON Lines file,
//! `conversations/<profile_id>.jsonl`, appended one record per line.
//! Lines that fail to parse are skipped with a warning.

use crate::paths::{VibecoderPaths, profile_file_name};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use vibecoder_core::Result;
use vibecoder_core::conversation::{
    ConversationLogRepository, ConversationRecord, PageCursor, select_page,
};

#[derive(Debug)]
pub struct JsonlConversationLog {
    conversations_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlConversationLog {
    pub fn new(paths: &VibecoderPaths) -> Result<Self> {
        Ok(Self::with_dir(paths.conversations_dir()?))
    }

    pub fn with_dir(conversations_dir: impl Into<PathBuf>) -> Self {
        Self {
            conversations_dir: conversations_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn log_path(&self, profile_id: &str) -> PathBuf {
        self.conversations_dir
            .join(profile_file_name(profile_id, "jsonl"))
    }

    async fn read_all(&self, profile_id: &str) -> Result<Vec<ConversationRecord>> {
        let path = self.log_path(profile_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ConversationRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    target: "vibecoder::storage",
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping unreadable conversation record"
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ConversationLogRepository for JsonlConversationLog {
    async fn append(&self, mut record: ConversationRecord) -> Result<ConversationRecord> {
        let _guard = self.write_lock.lock().await;
        let existing = self.read_all(&record.profile_id).await?;
        record.sequence = existing
            .iter()
            .map(|r| r.sequence)
            .max()
            .map_or(1, |last| last + 1);

        tokio::fs::create_dir_all(&self.conversations_dir).await?;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(&record.profile_id))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.sync_all().await?;

        tracing::debug!(
            target: "vibecoder::storage",
            profile_id = %record.profile_id,
            sequence = record.sequence,
            "Appended conversation record"
        );
        Ok(record)
    }

    async fn page_before(
        &self,
        profile_id: &str,
        before: Option<&PageCursor>,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let records = self.read_all(profile_id).await?;
        Ok(select_page(&records, before, limit))
    }

    async fn purge(&self, profile_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.log_path(profile_id)).await {
            Ok(()) => {
                tracing::info!(target: "vibecoder::storage", profile_id, "Purged conversation log");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
