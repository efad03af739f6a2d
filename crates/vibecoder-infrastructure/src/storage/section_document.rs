//! One profile's stored sections, independent of where they are kept.

use vibecoder_core::section::Section;
use vibecoder_core::{Result, VibeError};

/// Stored sections of a single profile, kept sorted by `display_order`.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectionDocument {
    pub sections: Vec<Section>,
}

impl SectionDocument {
    pub fn new(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.display_order);
        Self { sections }
    }

    pub fn insert(&mut self, section: &Section) -> Result<()> {
        if self.sections.iter().any(|s| s.id == section.id) {
            return Err(VibeError::internal(format!(
                "section '{}' is already stored",
                section.id
            )));
        }
        self.sections.push(section.clone());
        self.sections.sort_by_key(|s| s.display_order);
        Ok(())
    }

    pub fn update(&mut self, section: &Section) -> Result<()> {
        let stored = self
            .sections
            .iter_mut()
            .find(|s| s.id == section.id)
            .ok_or_else(|| VibeError::not_found("section", &section.id))?;
        *stored = section.clone();
        self.sections.sort_by_key(|s| s.display_order);
        Ok(())
    }

    /// Returns whether anything was removed.
    pub fn delete(&mut self, section_id: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != section_id);
        self.sections.len() != before
    }

    /// Renumbers `display_order` by position in `ordered_ids`. Stored
    /// sections missing from `ordered_ids` keep their relative order after
    /// the listed ones.
    pub fn reorder(&mut self, ordered_ids: &[String]) {
        let rank = |section: &Section| {
            ordered_ids
                .iter()
                .position(|id| *id == section.id)
                .unwrap_or(ordered_ids.len())
        };
        self.sections.sort_by_key(|s| (rank(s), s.display_order));
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.display_order = index as u32;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use vibecoder_core::section::{SectionContent, StyleOptions, TextContent};

    pub(crate) fn stored_section(profile_id: &str, id: &str, display_order: u32) -> Section {
        Section {
            id: id.to_string(),
            profile_id: profile_id.to_string(),
            display_order,
            content: SectionContent::Text(TextContent {
                title: id.to_string(),
                body: String::new(),
            }),
            style_options: StyleOptions::default(),
            is_visible: true,
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn ids(doc: &SectionDocument) -> Vec<&str> {
        doc.sections.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_reorder_keeps_unlisted_sections_last() {
        let mut doc = SectionDocument::new(vec![
            stored_section("p", "b", 1),
            stored_section("p", "a", 0),
            stored_section("p", "c", 2),
        ]);
        assert_eq!(ids(&doc), vec!["a", "b", "c"]);

        doc.reorder(&["c".to_string(), "a".to_string()]);
        assert_eq!(ids(&doc), vec!["c", "a", "b"]);
        assert_eq!(
            doc.sections.iter().map(|s| s.display_order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_insert_duplicate_and_update_missing_fail() {
        let mut doc = SectionDocument::default();
        doc.insert(&stored_section("p", "a", 0)).unwrap();
        assert!(doc.insert(&stored_section("p", "a", 0)).is_err());
        assert!(doc.update(&stored_section("p", "zzz", 0)).unwrap_err().is_not_found());
        assert!(!doc.delete("zzz"));
        assert!(doc.delete("a"));
    }
}
