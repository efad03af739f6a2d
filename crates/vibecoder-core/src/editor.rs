//! Section editor: the single mutation path for a profile's sections.
//!
//! `SectionEditor` owns the section list and its history and drives every
//! batch through validation, application, history push and side-effect
//! dispatch, in that order.

use crate::catalog::SectionCatalog;
use crate::config::VibecoderConfig;
use crate::error::{Result, VibeError};
use crate::history::HistoryStack;
use crate::operation::{
    ApplySideEffects, Operation, OperationApplier, OperationValidator, SectionDraft, SectionPatch,
    SideEffect, ValidationResult,
};
use crate::section::{Section, SectionList, SectionType};
use std::sync::Arc;

/// What a committed batch did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub created_ids: Vec<String>,
    pub side_effects: Vec<SideEffect>,
    pub inverse: Vec<Operation>,
}

#[derive(Debug, Clone)]
pub struct SectionEditor {
    list: SectionList,
    history: HistoryStack,
    validator: OperationValidator,
    applier: OperationApplier,
}

impl SectionEditor {
    pub fn new(list: SectionList, config: &VibecoderConfig, catalog: Arc<SectionCatalog>) -> Self {
        let history = HistoryStack::new(list.sections().to_vec(), config.history.max_entries);
        Self {
            list,
            history,
            validator: OperationValidator::new(Arc::clone(&catalog), config.limits.clone()),
            applier: OperationApplier::new(catalog),
        }
    }

    /// Editor over the standard catalog with default limits.
    pub fn with_defaults(list: SectionList) -> Self {
        Self::new(list, &VibecoderConfig::default(), SectionCatalog::shared())
    }

    pub fn list(&self) -> &SectionList {
        &self.list
    }

    pub fn sections(&self) -> &[Section] {
        self.list.sections()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Per-operation validation results, without applying anything.
    pub fn validate(&self, ops: &[Operation]) -> Vec<ValidationResult> {
        self.validator.validate_batch(self.list.sections(), ops)
    }

    /// The list `ops` would produce, with `preview-N` ids for new sections.
    pub fn preview(&self, ops: &[Operation]) -> Result<Vec<Section>> {
        self.validator.ensure_valid(self.list.sections(), ops)?;
        self.applier.preview(&self.list, ops)
    }

    /// Validates and applies `ops` as one all-or-nothing unit.
    ///
    /// On error the list, the history and the side-effect receiver are all
    /// left untouched. On success exactly one history entry is pushed.
    pub fn commit(
        &mut self,
        ops: &[Operation],
        effects: &dyn ApplySideEffects,
    ) -> Result<CommitReport> {
        if ops.is_empty() {
            return Ok(CommitReport::default());
        }

        self.validator.ensure_valid(self.list.sections(), ops)?;
        let batch = self.applier.apply(&self.list, ops)?;

        self.list = batch.list;
        self.history
            .push(self.list.sections().to_vec(), batch.inverse.clone());
        for effect in &batch.side_effects {
            effects.dispatch(effect);
        }

        tracing::info!(
            target: "vibecoder::editor",
            profile_id = %self.list.profile_id(),
            operations = ops.len(),
            sections = self.list.len(),
            "Committed operation batch"
        );

        Ok(CommitReport {
            created_ids: batch.created_ids,
            side_effects: batch.side_effects,
            inverse: batch.inverse,
        })
    }

    /// Restores the snapshot before the last committed batch.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.history.pop().is_none() {
            return false;
        }
        let sections = self.history.current().sections.clone();
        self.list.replace(sections);
        tracing::info!(target: "vibecoder::editor", "Undo restored previous snapshot");
        true
    }

    /// Undoes the last batch by replaying its inverse operations.
    ///
    /// Best-effort: sections recreated by an inverse `addSection` get fresh
    /// ids. If the replay fails, the history entry is kept.
    pub fn undo_with_inverse(&mut self, effects: &dyn ApplySideEffects) -> Result<bool> {
        let Some(entry) = self.history.pop() else {
            return Ok(false);
        };

        match self.applier.apply(&self.list, &entry.inverse) {
            Ok(batch) => {
                self.list = batch.list;
                for effect in &batch.side_effects {
                    effects.dispatch(effect);
                }
                tracing::info!(
                    target: "vibecoder::editor",
                    operations = entry.inverse.len(),
                    "Undo replayed inverse batch"
                );
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(target: "vibecoder::editor", error = %err, "Inverse replay failed");
                self.history.restore(entry);
                Err(err)
            }
        }
    }

    /// Flips a section's visibility. Returns the new value.
    pub fn toggle_visibility(
        &mut self,
        section_id: &str,
        effects: &dyn ApplySideEffects,
    ) -> Result<bool> {
        let visible = self
            .list
            .get(section_id)
            .map(|s| s.is_visible)
            .ok_or_else(|| VibeError::not_found("section", section_id))?;

        self.commit(
            &[Operation::UpdateSection {
                section_id: section_id.to_string(),
                patch: SectionPatch::visibility(!visible),
            }],
            effects,
        )?;
        Ok(!visible)
    }

    /// Adds a catalog-default section after `after`. Returns the new id.
    pub fn add_section(
        &mut self,
        section_type: SectionType,
        after: Option<&str>,
        effects: &dyn ApplySideEffects,
    ) -> Result<String> {
        let report = self.commit(
            &[Operation::AddSection {
                after: after.map(str::to_string),
                section: SectionDraft::of_type(section_type),
            }],
            effects,
        )?;
        report
            .created_ids
            .into_iter()
            .next()
            .ok_or_else(|| VibeError::internal("addSection created no section"))
    }

    /// Replaces the whole list, e.g. after reloading from storage, and
    /// restarts history from it.
    pub fn reset(&mut self, list: SectionList) {
        self.history.reset(list.sections().to_vec());
        self.list = list;
    }
}
