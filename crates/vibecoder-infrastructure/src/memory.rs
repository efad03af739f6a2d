//! In-memory repositories.
//!
//! Used by tests and by the CLI when no data directory is configured.

use crate::storage::SectionDocument;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use vibecoder_core::Result;
use vibecoder_core::conversation::{
    ConversationLogRepository, ConversationRecord, PageCursor, select_page,
};
use vibecoder_core::section::{Section, SectionRepository};

#[derive(Debug, Default)]
pub struct InMemorySectionRepository {
    documents: Mutex<HashMap<String, SectionDocument>>,
}

impl InMemorySectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `sections`, grouped by profile.
    pub fn with_sections(sections: Vec<Section>) -> Self {
        let mut grouped: HashMap<String, Vec<Section>> = HashMap::new();
        for section in sections {
            grouped
                .entry(section.profile_id.clone())
                .or_default()
                .push(section);
        }
        let documents = grouped
            .into_iter()
            .map(|(profile_id, sections)| (profile_id, SectionDocument::new(sections)))
            .collect();
        Self {
            documents: Mutex::new(documents),
        }
    }
}

#[async_trait]
impl SectionRepository for InMemorySectionRepository {
    async fn load(&self, profile_id: &str) -> Result<Vec<Section>> {
        let documents = self.documents.lock().await;
        Ok(documents
            .get(profile_id)
            .map(|doc| doc.sections.clone())
            .unwrap_or_default())
    }

    async fn insert(&self, section: &Section) -> Result<()> {
        let mut documents = self.documents.lock().await;
        documents
            .entry(section.profile_id.clone())
            .or_default()
            .insert(section)
    }

    async fn update(&self, section: &Section) -> Result<()> {
        let mut documents = self.documents.lock().await;
        documents
            .entry(section.profile_id.clone())
            .or_default()
            .update(section)
    }

    async fn delete(&self, profile_id: &str, section_id: &str) -> Result<()> {
        let mut documents = self.documents.lock().await;
        if let Some(doc) = documents.get_mut(profile_id) {
            doc.delete(section_id);
        }
        Ok(())
    }

    async fn reorder(&self, profile_id: &str, ordered_ids: &[String]) -> Result<()> {
        let mut documents = self.documents.lock().await;
        if let Some(doc) = documents.get_mut(profile_id) {
            doc.reorder(ordered_ids);
        }
        Ok(())
    }
}

/// Conversation log held in memory. Sequences start at 1 per profile.
#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    records: Mutex<HashMap<String, Vec<ConversationRecord>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record of `profile_id`, in append order.
    pub async fn records(&self, profile_id: &str) -> Vec<ConversationRecord> {
        self.records
            .lock()
            .await
            .get(profile_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ConversationLogRepository for InMemoryConversationLog {
    async fn append(&self, mut record: ConversationRecord) -> Result<ConversationRecord> {
        let mut records = self.records.lock().await;
        let log = records.entry(record.profile_id.clone()).or_default();
        record.sequence = log.last().map_or(1, |last| last.sequence + 1);
        log.push(record.clone());
        Ok(record)
    }

    async fn page_before(
        &self,
        profile_id: &str,
        before: Option<&PageCursor>,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .get(profile_id)
            .map(|log| select_page(log, before, limit))
            .unwrap_or_default())
    }

    async fn purge(&self, profile_id: &str) -> Result<()> {
        self.records.lock().await.remove(profile_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::section_document_tests::stored_section;
    use vibecoder_core::conversation::MessageRole;

    fn record(profile_id: &str, content: &str, timestamp: &str) -> ConversationRecord {
        ConversationRecord {
            id: content.to_string(),
            profile_id: profile_id.to_string(),
            role: MessageRole::User,
            content: content.to_string(),
            operations: Vec::new(),
            asset_requests: Vec::new(),
            timestamp: timestamp.to_string(),
            sequence: 0,
        }
    }

    #[tokio::test]
    async fn test_sections_are_scoped_by_profile() {
        let repo = InMemorySectionRepository::with_sections(vec![
            stored_section("p1", "b", 1),
            stored_section("p1", "a", 0),
            stored_section("p2", "x", 0),
        ]);

        let ids: Vec<String> = repo.load("p1").await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        repo.delete("p1", "a").await.unwrap();
        repo.delete("p1", "missing").await.unwrap();
        assert_eq!(repo.load("p1").await.unwrap().len(), 1);
        assert_eq!(repo.load("p2").await.unwrap().len(), 1);
        assert!(repo.load("p3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reorder_renumbers() {
        let repo = InMemorySectionRepository::new();
        for (order, id) in ["a", "b", "c"].into_iter().enumerate() {
            repo.insert(&stored_section("p1", id, order as u32)).await.unwrap();
        }
        repo.reorder("p1", &["c".to_string(), "b".to_string(), "a".to_string()])
            .await
            .unwrap();

        let stored = repo.load("p1").await.unwrap();
        assert_eq!(stored[0].id, "c");
        assert_eq!(stored[2].display_order, 2);
    }

    #[tokio::test]
    async fn test_log_sequences_per_profile() {
        let log = InMemoryConversationLog::new();
        let first = log
            .append(record("p1", "hi", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        let second = log
            .append(record("p1", "again", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        let other = log
            .append(record("p2", "elsewhere", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();

        assert_eq!((first.sequence, second.sequence, other.sequence), (1, 2, 1));

        let page = log.page_before("p1", Some(&second.cursor()), 10).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].content, "hi");

        log.purge("p1").await.unwrap();
        assert!(log.records("p1").await.is_empty());
        assert_eq!(log.records("p2").await.len(), 1);
    }
}
