//! File-based `SectionRepository`.
//!
//! Each profile's sections live in one JSON document,
//! `sections/<profile_id>.json`, holding the stored list sorted by
//! `display_order`. Every mutation rewrites the document atomically.

use crate::paths::{VibecoderPaths, profile_file_name};
use crate::storage::{AtomicJsonFile, SectionDocument};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;
use vibecoder_core::Result;
use vibecoder_core::section::{Section, SectionRepository};

#[derive(Debug)]
pub struct JsonSectionRepository {
    sections_dir: PathBuf,
    /// Serializes read-modify-write cycles across profiles
    write_lock: Mutex<()>,
}

impl JsonSectionRepository {
    pub fn new(paths: &VibecoderPaths) -> Result<Self> {
        Ok(Self::with_dir(paths.sections_dir()?))
    }

    pub fn with_dir(sections_dir: impl Into<PathBuf>) -> Self {
        Self {
            sections_dir: sections_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn file(&self, profile_id: &str) -> AtomicJsonFile<Vec<Section>> {
        AtomicJsonFile::new(
            self.sections_dir
                .join(profile_file_name(profile_id, "json")),
        )
    }

    async fn read_document(&self, profile_id: &str) -> Result<SectionDocument> {
        let sections = self.file(profile_id).load().await?.unwrap_or_default();
        Ok(SectionDocument::new(sections))
    }

    async fn modify<F>(&self, profile_id: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut SectionDocument) -> Result<bool>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document(profile_id).await?;
        if change(&mut document)? {
            self.file(profile_id).save(&document.sections).await?;
            tracing::debug!(
                target: "vibecoder::storage",
                profile_id,
                sections = document.sections.len(),
                "Saved section document"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl SectionRepository for JsonSectionRepository {
    async fn load(&self, profile_id: &str) -> Result<Vec<Section>> {
        Ok(self.read_document(profile_id).await?.sections)
    }

    async fn insert(&self, section: &Section) -> Result<()> {
        self.modify(&section.profile_id, |doc| doc.insert(section).map(|_| true))
            .await
    }

    async fn update(&self, section: &Section) -> Result<()> {
        self.modify(&section.profile_id, |doc| doc.update(section).map(|_| true))
            .await
    }

    async fn delete(&self, profile_id: &str, section_id: &str) -> Result<()> {
        self.modify(profile_id, |doc| Ok(doc.delete(section_id)))
            .await
    }

    async fn reorder(&self, profile_id: &str, ordered_ids: &[String]) -> Result<()> {
        self.modify(profile_id, |doc| {
            doc.reorder(ordered_ids);
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::section_document_tests::stored_section;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let paths = VibecoderPaths::new(Some(dir.path()));

        {
            let repo = JsonSectionRepository::new(&paths).unwrap();
            repo.insert(&stored_section("shop-1", "a", 0)).await.unwrap();
            repo.insert(&stored_section("shop-1", "b", 1)).await.unwrap();
            let mut hidden = stored_section("shop-1", "b", 1);
            hidden.is_visible = false;
            repo.update(&hidden).await.unwrap();
            repo.reorder("shop-1", &["b".to_string(), "a".to_string()])
                .await
                .unwrap();
        }

        assert!(dir.path().join("sections/shop-1.json").exists());

        let reopened = JsonSectionRepository::new(&paths).unwrap();
        let stored = reopened.load("shop-1").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, "b");
        assert!(!stored[0].is_visible);
        assert_eq!(stored[1].display_order, 1);
    }

    #[tokio::test]
    async fn test_lookalike_profile_ids_do_not_share_sections() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSectionRepository::with_dir(dir.path());

        repo.insert(&stored_section("shop/1", "a", 0)).await.unwrap();
        assert!(repo.load("shop_1").await.unwrap().is_empty());

        repo.insert(&stored_section("shop_1", "b", 0)).await.unwrap();
        let first = repo.load("shop/1").await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "a");
    }

    #[tokio::test]
    async fn test_missing_profile_and_missing_section() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSectionRepository::with_dir(dir.path());

        assert!(repo.load("nobody").await.unwrap().is_empty());
        repo.delete("nobody", "a").await.unwrap();
        assert!(!dir.path().join("nobody.json").exists());

        let err = repo
            .update(&stored_section("nobody", "a", 0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
