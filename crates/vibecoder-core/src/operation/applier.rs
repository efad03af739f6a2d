//! Operation application.
//!
//! The applier is a reducer over a scratch copy of a [`SectionList`]: it never
//! touches the caller's list, dispatches nothing and pushes no history. The
//! editor swaps the result in and dispatches the collected side effects once
//! the whole batch has applied.

use super::effects::SideEffect;
use super::model::{Operation, SectionDraft, SectionPatch};
use crate::catalog::SectionCatalog;
use crate::error::{Result, VibeError};
use crate::section::{Section, SectionList};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Result of applying a batch to a scratch copy.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedBatch {
    pub list: SectionList,
    /// Ids minted by `addSection`, in batch order
    pub created_ids: Vec<String>,
    /// Theme, header and slot changes, in batch order, not yet dispatched
    pub side_effects: Vec<SideEffect>,
    /// Undo batch, already in reverse order
    pub inverse: Vec<Operation>,
}

enum IdMint {
    Uuid,
    Preview(usize),
}

impl IdMint {
    fn next(&mut self) -> String {
        match self {
            Self::Uuid => Uuid::new_v4().to_string(),
            Self::Preview(counter) => {
                *counter += 1;
                format!("preview-{counter}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationApplier {
    catalog: Arc<SectionCatalog>,
}

impl OperationApplier {
    pub fn new(catalog: Arc<SectionCatalog>) -> Self {
        Self { catalog }
    }

    /// Applies `ops` in order to a copy of `list`.
    ///
    /// The batch is expected to be validated. An operation that still cannot
    /// apply (a section vanished, a patch no longer fits its type) fails the
    /// whole batch with an application error.
    pub fn apply(&self, list: &SectionList, ops: &[Operation]) -> Result<AppliedBatch> {
        self.run(list, ops, IdMint::Uuid)
    }

    /// Same semantics as [`apply`](Self::apply) with `preview-N` ids; the
    /// collected side effects are dropped.
    pub fn preview(&self, list: &SectionList, ops: &[Operation]) -> Result<Vec<Section>> {
        Ok(self
            .run(list, ops, IdMint::Preview(0))?
            .list
            .into_sections())
    }

    fn run(&self, list: &SectionList, ops: &[Operation], mut ids: IdMint) -> Result<AppliedBatch> {
        let mut scratch = list.clone();
        let mut created_ids = Vec::new();
        let mut side_effects = Vec::new();
        let mut inverse = Vec::with_capacity(ops.len());
        let now = crate::now_timestamp();

        for op in ops {
            tracing::debug!(target: "vibecoder::editor", kind = op.kind(), "Applying operation");

            let undo = match op {
                Operation::AddSection { after, section } => {
                    let id = ids.next();
                    let created = self.build_section(scratch.profile_id(), &id, section, &now)?;
                    scratch.insert_after(created, after.as_deref());
                    created_ids.push(id.clone());
                    Operation::RemoveSection { section_id: id }
                }
                Operation::RemoveSection { section_id } => {
                    let predecessor = scratch.predecessor_id(section_id);
                    let removed = scratch.remove(section_id).map_err(|_| vanished(section_id))?;
                    Operation::AddSection {
                        after: predecessor,
                        section: SectionDraft::from_section(&removed)?,
                    }
                }
                Operation::MoveSection { section_id, after } => {
                    let predecessor = scratch.predecessor_id(section_id);
                    scratch
                        .move_after(section_id, after.as_deref())
                        .map_err(|_| vanished(section_id))?;
                    Operation::MoveSection {
                        section_id: section_id.clone(),
                        after: predecessor,
                    }
                }
                Operation::UpdateSection { section_id, patch } => {
                    let section = scratch
                        .get_mut(section_id)
                        .ok_or_else(|| vanished(section_id))?;
                    let restore = restoring_patch(section, patch)?;
                    patch_section(section, patch, &now)?;
                    Operation::UpdateSection {
                        section_id: section_id.clone(),
                        patch: restore,
                    }
                }
                Operation::UpdateTheme { path, value } => {
                    side_effects.push(SideEffect::ThemeUpdated {
                        path: path.clone(),
                        value: value.clone(),
                    });
                    op.clone()
                }
                Operation::UpdateHeaderContent { patch } => {
                    side_effects.push(SideEffect::HeaderUpdated {
                        patch: patch.clone(),
                    });
                    op.clone()
                }
                Operation::AssignAssetToSlot {
                    slot,
                    asset_id,
                    target_id,
                } => {
                    side_effects.push(SideEffect::AssetAssigned {
                        slot: slot.clone(),
                        asset_id: asset_id.clone(),
                        target_id: target_id.clone(),
                    });
                    op.clone()
                }
            };
            inverse.push(undo);
        }

        inverse.reverse();
        Ok(AppliedBatch {
            list: scratch,
            created_ids,
            side_effects,
            inverse,
        })
    }

    fn build_section(
        &self,
        profile_id: &str,
        id: &str,
        draft: &SectionDraft,
        now: &str,
    ) -> Result<Section> {
        let entry = self
            .catalog
            .resolve(&draft.section_type)
            .and_then(|t| self.catalog.entry(t))
            .ok_or_else(|| {
                VibeError::application(format!("invalid type '{}'", draft.section_type))
            })?;

        let content = match &draft.content {
            Some(patch) => entry.default_content.merged(patch)?,
            None => entry.default_content.clone(),
        };

        let requested_preset = draft
            .style_options
            .as_ref()
            .and_then(|style| style.get("preset"))
            .and_then(Value::as_str);
        let base = entry.default_style(requested_preset);
        let mut style_options = match &draft.style_options {
            Some(patch) => base.merged(patch)?,
            None => base.clone(),
        };
        style_options.preset = base.preset;

        Ok(Section {
            id: id.to_string(),
            profile_id: profile_id.to_string(),
            display_order: 0,
            content,
            style_options,
            is_visible: draft.is_visible.unwrap_or(true),
            updated_at: now.to_string(),
        })
    }
}

fn vanished(section_id: &str) -> VibeError {
    VibeError::application(format!("section '{section_id}' no longer exists"))
}

fn patch_section(section: &mut Section, patch: &SectionPatch, now: &str) -> Result<()> {
    if let Some(content) = &patch.content {
        section.content = section.content.merged(content)?;
    }
    if let Some(style) = &patch.style_options {
        section.style_options = section.style_options.merged(style)?;
    }
    if let Some(is_visible) = patch.is_visible {
        section.is_visible = is_visible;
    }
    section.updated_at = now.to_string();
    Ok(())
}

/// Patch that puts back the parts of `section` that `patch` is about to touch.
fn restoring_patch(section: &Section, patch: &SectionPatch) -> Result<SectionPatch> {
    let content = match &patch.content {
        Some(incoming) => Some(restoring_map(section.content.to_map()?, incoming)),
        None => None,
    };
    let style_options = match &patch.style_options {
        Some(incoming) => Some(restoring_map(section.style_options.to_map()?, incoming)),
        None => None,
    };
    Ok(SectionPatch {
        content,
        style_options,
        is_visible: patch.is_visible.map(|_| section.is_visible),
    })
}

/// Keys the patch introduces that were absent before are reset to null.
fn restoring_map(mut previous: Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    for key in incoming.keys() {
        if !previous.contains_key(key) {
            previous.insert(key.clone(), Value::Null);
        }
    }
    previous
}
