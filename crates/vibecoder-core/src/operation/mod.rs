//! Operation module: the AI edit protocol.
//!
//! # Module Structure
//!
//! - `model`: the `Operation` tagged union and its payloads
//! - `validator`: all-or-nothing batch validation
//! - `applier`: apply, preview and inverse generation
//! - `effects`: side channels for theme, header and slot operations

mod applier;
mod effects;
mod model;
mod validator;

pub use applier::{AppliedBatch, OperationApplier};
pub use effects::{ApplySideEffects, NoSideEffects, SideEffect};
pub use model::{HeaderPatch, Operation, SectionDraft, SectionPatch};
pub use validator::{OperationValidator, ValidationResult};
