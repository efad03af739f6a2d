//! Operation validation.
//!
//! Pure checks run over a whole batch before anything is applied: type
//! whitelist, referential integrity, content safety and size limits. A single
//! failure rejects the batch.

use super::model::{HeaderPatch, Operation};
use crate::catalog::SectionCatalog;
use crate::config::LimitsConfig;
use crate::error::{Result, VibeError};
use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

const INJECTION_MARKERS: [&str; 2] = ["<script", "javascript:"];

/// Outcome of validating one operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Projection of the section list as the batch progresses.
struct BatchScope {
    ids: HashSet<String>,
    count: usize,
}

impl BatchScope {
    fn new(sections: &[Section]) -> Self {
        Self {
            ids: sections.iter().map(|s| s.id.clone()).collect(),
            count: sections.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationValidator {
    catalog: Arc<SectionCatalog>,
    limits: LimitsConfig,
}

impl OperationValidator {
    pub fn new(catalog: Arc<SectionCatalog>, limits: LimitsConfig) -> Self {
        Self { catalog, limits }
    }

    /// Validates a single operation against `sections`.
    pub fn validate(&self, sections: &[Section], op: &Operation) -> ValidationResult {
        let mut scope = BatchScope::new(sections);
        ValidationResult::from_errors(self.check(&mut scope, op))
    }

    /// Validates every operation of a batch, each against the projection left
    /// by the valid operations before it.
    pub fn validate_batch(&self, sections: &[Section], ops: &[Operation]) -> Vec<ValidationResult> {
        let mut scope = BatchScope::new(sections);
        ops.iter()
            .map(|op| ValidationResult::from_errors(self.check(&mut scope, op)))
            .collect()
    }

    /// All-or-nothing gate: `Err(VibeError::Validation)` with every message,
    /// each prefixed by its 1-based position and operation kind.
    pub fn ensure_valid(&self, sections: &[Section], ops: &[Operation]) -> Result<()> {
        let errors: Vec<String> = self
            .validate_batch(sections, ops)
            .into_iter()
            .zip(ops)
            .enumerate()
            .flat_map(|(index, (result, op))| {
                result
                    .errors
                    .into_iter()
                    .map(move |e| format!("operation {} ({}): {}", index + 1, op.kind(), e))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::warn!(
                target: "vibecoder::editor",
                rejected = errors.len(),
                "Operation batch rejected"
            );
            Err(VibeError::Validation(errors))
        }
    }

    fn check(&self, scope: &mut BatchScope, op: &Operation) -> Vec<String> {
        let mut errors = Vec::new();

        match op {
            Operation::AddSection { section, .. } => {
                if self.catalog.resolve(&section.section_type).is_none() {
                    errors.push(format!("invalid type '{}'", section.section_type));
                }
                if scope.count + 1 > self.limits.max_sections {
                    errors.push(format!(
                        "section limit reached (max {})",
                        self.limits.max_sections
                    ));
                }
                if contains_injection(section) {
                    errors.push("script injection detected".to_string());
                }
                if errors.is_empty() {
                    scope.count += 1;
                }
            }
            Operation::RemoveSection { section_id } => {
                require_known(scope, section_id, &mut errors);
                if errors.is_empty() {
                    scope.ids.remove(section_id);
                    scope.count -= 1;
                }
            }
            Operation::MoveSection { section_id, after } => {
                require_known(scope, section_id, &mut errors);
                if let Some(after) = after {
                    if after == section_id {
                        errors.push("cannot move a section after itself".to_string());
                    } else {
                        require_known(scope, after, &mut errors);
                    }
                }
            }
            Operation::UpdateSection { section_id, patch } => {
                require_known(scope, section_id, &mut errors);
                if contains_injection(patch) {
                    errors.push("script injection detected".to_string());
                }
            }
            Operation::UpdateHeaderContent { patch } => {
                self.check_header(patch, &mut errors);
            }
            // Opaque to the core: owned by the theme and asset systems.
            Operation::UpdateTheme { .. } | Operation::AssignAssetToSlot { .. } => {}
        }

        errors
    }

    fn check_header(&self, patch: &HeaderPatch, errors: &mut Vec<String>) {
        if let Some(name) = &patch.display_name {
            let len = name.chars().count();
            if len > self.limits.display_name_max_chars {
                errors.push(format!(
                    "display name must be at most {} characters (got {len})",
                    self.limits.display_name_max_chars
                ));
            }
        }
        if let Some(bio) = &patch.bio {
            let len = bio.chars().count();
            if len > self.limits.bio_max_chars {
                errors.push(format!(
                    "bio must be at most {} characters (got {len})",
                    self.limits.bio_max_chars
                ));
            }
        }
    }
}

fn require_known(scope: &BatchScope, id: &str, errors: &mut Vec<String>) {
    if !scope.ids.contains(id) {
        errors.push(format!("section '{id}' not found"));
    }
}

/// String scan of the serialized payload. Not a sanitizer.
fn contains_injection<T: Serialize>(payload: &T) -> bool {
    match serde_json::to_string(payload) {
        Ok(serialized) => {
            let lowered = serialized.to_lowercase();
            INJECTION_MARKERS.iter().any(|m| lowered.contains(m))
        }
        Err(_) => true,
    }
}
