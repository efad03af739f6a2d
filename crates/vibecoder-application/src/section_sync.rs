//! Best-effort persistence of a committed section list.
//!
//! The in-memory list is the source of truth. Sync failures are collected and
//! reported; they never roll back the local state.

use vibecoder_core::section::{SectionList, SectionRepository};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub reordered: bool,
    pub failures: Vec<String>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes the difference between `before` and `after` to `repository`.
pub async fn sync_sections(
    repository: &dyn SectionRepository,
    before: &SectionList,
    after: &SectionList,
) -> SyncReport {
    let mut report = SyncReport::default();
    let profile_id = after.profile_id();

    for section in before.sections() {
        if after.contains(&section.id) {
            continue;
        }
        match repository.delete(profile_id, &section.id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => report
                .failures
                .push(format!("delete {}: {}", section.id, e)),
        }
    }

    for section in after.sections() {
        match before.get(&section.id) {
            None => match repository.insert(section).await {
                Ok(()) => report.inserted += 1,
                Err(e) => report
                    .failures
                    .push(format!("insert {}: {}", section.id, e)),
            },
            Some(previous) => {
                let changed = previous.content != section.content
                    || previous.style_options != section.style_options
                    || previous.is_visible != section.is_visible
                    || previous.updated_at != section.updated_at;
                if !changed {
                    continue;
                }
                match repository.update(section).await {
                    Ok(()) => report.updated += 1,
                    Err(e) => report
                        .failures
                        .push(format!("update {}: {}", section.id, e)),
                }
            }
        }
    }

    if before.ids() != after.ids() {
        match repository.reorder(profile_id, &after.ids()).await {
            Ok(()) => report.reordered = true,
            Err(e) => report.failures.push(format!("reorder: {e}")),
        }
    }

    if report.is_clean() {
        tracing::debug!(
            target: "vibecoder::sync",
            profile_id = %profile_id,
            inserted = report.inserted,
            updated = report.updated,
            deleted = report.deleted,
            reordered = report.reordered,
            "Synced sections"
        );
    } else {
        tracing::warn!(
            target: "vibecoder::sync",
            profile_id = %profile_id,
            failures = report.failures.len(),
            "Section sync incomplete"
        );
    }

    report
}
