//! Ordered section list for one profile.
//!
//! `SectionList` owns the sections and exposes the structural primitives the
//! operation applier is built on. Every structural primitive renumbers
//! `display_order` densely over the whole list.

use super::model::Section;
use crate::error::{Result, VibeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionList {
    profile_id: String,
    sections: Vec<Section>,
}

impl SectionList {
    /// Creates an empty list for `profile_id`.
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            sections: Vec::new(),
        }
    }

    /// Builds a list from stored sections.
    ///
    /// Sections are sorted by their stored `display_order` and renumbered, so
    /// gaps left by an interrupted sync are closed on load.
    pub fn from_sections(profile_id: impl Into<String>, mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.display_order);
        let mut list = Self {
            profile_id: profile_id.into(),
            sections,
        };
        list.renumber();
        list
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Id of the section right before `id`, if any.
    pub fn predecessor_id(&self, id: &str) -> Option<String> {
        match self.position(id) {
            Some(index) if index > 0 => Some(self.sections[index - 1].id.clone()),
            _ => None,
        }
    }

    /// Inserts `section` right after `after`, or at the head when `after` is
    /// `None` or not in the list. Returns the insertion index.
    pub fn insert_after(&mut self, section: Section, after: Option<&str>) -> usize {
        let index = after
            .and_then(|id| self.position(id))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.sections.insert(index, section);
        self.renumber();
        index
    }

    /// Removes the section with `id` and returns it.
    pub fn remove(&mut self, id: &str) -> Result<Section> {
        let index = self
            .position(id)
            .ok_or_else(|| VibeError::not_found("section", id))?;
        let removed = self.sections.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Moves the section with `id` right after `after` (head rule as in
    /// [`insert_after`](Self::insert_after)). Returns the new index.
    pub fn move_after(&mut self, id: &str, after: Option<&str>) -> Result<usize> {
        let index = self
            .position(id)
            .ok_or_else(|| VibeError::not_found("section", id))?;
        let section = self.sections.remove(index);
        Ok(self.insert_after(section, after))
    }

    /// Replaces the whole list, used by history restore.
    pub fn replace(&mut self, sections: Vec<Section>) {
        self.sections = sections;
        self.renumber();
    }

    fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.display_order = index as u32;
        }
    }

    /// True when `display_order` equals the array position for every section.
    pub fn is_densely_ordered(&self) -> bool {
        self.sections
            .iter()
            .enumerate()
            .all(|(index, s)| s.display_order as usize == index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::section::{SectionContent, StyleOptions, TextContent};

    pub(crate) fn text_section(id: &str) -> Section {
        Section {
            id: id.to_string(),
            profile_id: "profile-1".to_string(),
            display_order: 0,
            content: SectionContent::Text(TextContent {
                title: id.to_string(),
                body: String::new(),
            }),
            style_options: StyleOptions::default(),
            is_visible: true,
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    pub(crate) fn list_of(ids: &[&str]) -> SectionList {
        let mut list = SectionList::new("profile-1");
        let mut after: Option<String> = None;
        for id in ids {
            list.insert_after(text_section(id), after.as_deref());
            after = Some(id.to_string());
        }
        list
    }

    #[test]
    fn test_insert_after_none_goes_to_head() {
        let mut list = list_of(&["a", "b", "c"]);
        let index = list.insert_after(text_section("new"), None);

        assert_eq!(index, 0);
        assert_eq!(list.ids(), vec!["new", "a", "b", "c"]);
        assert!(list.is_densely_ordered());
    }

    #[test]
    fn test_insert_after_unknown_goes_to_head() {
        let mut list = list_of(&["a", "b"]);
        list.insert_after(text_section("new"), Some("missing"));
        assert_eq!(list.ids(), vec!["new", "a", "b"]);
    }

    #[test]
    fn test_move_after_renumbers() {
        let mut list = list_of(&["a", "b", "c", "d"]);
        list.move_after("a", Some("c")).unwrap();

        assert_eq!(list.ids(), vec!["b", "c", "a", "d"]);
        let orders: Vec<u32> = list.sections().iter().map(|s| s.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut list = list_of(&["a"]);
        assert!(list.remove("zzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_sections_closes_gaps() {
        let mut a = text_section("a");
        a.display_order = 7;
        let mut b = text_section("b");
        b.display_order = 2;

        let list = SectionList::from_sections("profile-1", vec![a, b]);
        assert_eq!(list.ids(), vec!["b", "a"]);
        assert!(list.is_densely_ordered());
    }

    #[test]
    fn test_predecessor_id() {
        let list = list_of(&["a", "b"]);
        assert_eq!(list.predecessor_id("b").as_deref(), Some("a"));
        assert_eq!(list.predecessor_id("a"), None);
    }
}
