//! Operation types of the AI edit protocol.

use crate::error::Result;
use crate::section::{LinkItem, Section};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One atomic, typed mutation instruction.
///
/// Operations are applied strictly in array order within a batch; each one
/// sees the result of the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Inserts a new section after `after` (head when absent or unknown).
    AddSection {
        #[serde(default)]
        after: Option<String>,
        section: SectionDraft,
    },
    RemoveSection {
        section_id: String,
    },
    /// Moves a section after `after` (head when absent).
    MoveSection {
        section_id: String,
        #[serde(default)]
        after: Option<String>,
    },
    UpdateSection {
        section_id: String,
        patch: SectionPatch,
    },
    /// Theme change, forwarded to the theme system untouched.
    UpdateTheme {
        path: String,
        value: Value,
    },
    UpdateHeaderContent {
        patch: HeaderPatch,
    },
    /// Asset placement, forwarded to the asset system untouched.
    AssignAssetToSlot {
        slot: String,
        asset_id: String,
        #[serde(default)]
        target_id: Option<String>,
    },
}

impl Operation {
    /// Wire name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddSection { .. } => "addSection",
            Self::RemoveSection { .. } => "removeSection",
            Self::MoveSection { .. } => "moveSection",
            Self::UpdateSection { .. } => "updateSection",
            Self::UpdateTheme { .. } => "updateTheme",
            Self::UpdateHeaderContent { .. } => "updateHeaderContent",
            Self::AssignAssetToSlot { .. } => "assignAssetToSlot",
        }
    }

    /// True for the kinds that change the section list.
    pub fn touches_sections(&self) -> bool {
        matches!(
            self,
            Self::AddSection { .. }
                | Self::RemoveSection { .. }
                | Self::MoveSection { .. }
                | Self::UpdateSection { .. }
        )
    }
}

/// Partial section supplied by `addSection`.
///
/// `section_type` stays a raw string so an unknown type reaches the validator
/// instead of failing deserialization of the whole batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionDraft {
    pub section_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl SectionDraft {
    pub fn of_type(section_type: impl AsRef<str>) -> Self {
        Self {
            section_type: section_type.as_ref().to_string(),
            ..Default::default()
        }
    }

    /// A draft that recreates `section` (apart from its id).
    pub fn from_section(section: &Section) -> Result<Self> {
        Ok(Self {
            section_type: section.section_type().to_string(),
            content: Some(section.content.to_map()?),
            style_options: Some(section.style_options.to_map()?),
            is_visible: Some(section.is_visible),
        })
    }
}

/// Patch supplied by `updateSection`; every part is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl SectionPatch {
    pub fn visibility(is_visible: bool) -> Self {
        Self {
            is_visible: Some(is_visible),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.style_options.is_none() && self.is_visible.is_none()
    }
}

/// Patch for the profile header, applied by the header system.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_uses_camel_case() {
        let op: Operation = serde_json::from_value(json!({
            "type": "updateSection",
            "sectionId": "abc",
            "patch": {"content": {"body": "Hi"}, "is_visible": false}
        }))
        .unwrap();

        match &op {
            Operation::UpdateSection { section_id, patch } => {
                assert_eq!(section_id, "abc");
                assert_eq!(patch.is_visible, Some(false));
                assert_eq!(patch.content.as_ref().unwrap()["body"], "Hi");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(op.kind(), "updateSection");
    }

    #[test]
    fn test_header_patch_with_links() {
        let op: Operation = serde_json::from_value(json!({
            "type": "updateHeaderContent",
            "patch": {
                "displayName": "Mara",
                "links": [{"label": "Shop", "url": "https://example.com"}]
            }
        }))
        .unwrap();

        let Operation::UpdateHeaderContent { patch } = &op else {
            panic!("unexpected {op:?}");
        };
        assert_eq!(patch.display_name.as_deref(), Some("Mara"));
        assert_eq!(patch.links.as_ref().map(Vec::len), Some(1));
        assert_eq!(op.kind(), "updateHeaderContent");
        assert_eq!(op.clone(), op);
    }

    #[test]
    fn test_add_section_after_defaults_to_none() {
        let op: Operation = serde_json::from_value(json!({
            "type": "addSection",
            "section": {"section_type": "text"}
        }))
        .unwrap();

        assert_eq!(
            op,
            Operation::AddSection {
                after: None,
                section: SectionDraft::of_type("text"),
            }
        );
    }

    #[test]
    fn test_unknown_section_type_still_parses() {
        let op: Operation = serde_json::from_value(json!({
            "type": "addSection",
            "after": null,
            "section": {"section_type": "carousel"}
        }))
        .unwrap();
        assert!(op.touches_sections());
    }

    #[test]
    fn test_header_patch_fields() {
        let op: Operation = serde_json::from_value(json!({
            "type": "updateHeaderContent",
            "patch": {"displayName": "Ana", "bannerAssetId": "asset-1"}
        }))
        .unwrap();

        let Operation::UpdateHeaderContent { patch } = op else {
            panic!("expected header op");
        };
        assert_eq!(patch.display_name.as_deref(), Some("Ana"));
        assert_eq!(patch.banner_asset_id.as_deref(), Some("asset-1"));
        assert!(patch.bio.is_none());
    }

    #[test]
    fn test_assign_asset_serializes_camel_case_fields() {
        let op = Operation::AssignAssetToSlot {
            slot: "banner".to_string(),
            asset_id: "asset-9".to_string(),
            target_id: None,
        };
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["type"], "assignAssetToSlot");
        assert_eq!(value["assetId"], "asset-9");
    }
}
