//! Section document repository trait.

use super::model::Section;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for a profile's section list, keyed by profile and section id.
///
/// The in-memory `SectionList` is the source of truth for rendering; this
/// store is synced after each committed batch on a best-effort basis.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Loads every section of a profile, in stored order.
    async fn load(&self, profile_id: &str) -> Result<Vec<Section>>;

    /// Inserts a new section.
    async fn insert(&self, section: &Section) -> Result<()>;

    /// Replaces an existing section.
    async fn update(&self, section: &Section) -> Result<()>;

    /// Deletes a section (no-op if it does not exist).
    async fn delete(&self, profile_id: &str, section_id: &str) -> Result<()>;

    /// Rewrites `display_order` so the stored order matches `ordered_ids`.
    async fn reorder(&self, profile_id: &str, ordered_ids: &[String]) -> Result<()>;
}
