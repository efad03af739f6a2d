//! Section catalog module.
//!
//! Static registry mapping each section type to its default content and
//! named presets.

mod preset;
mod registry;

pub use preset::SectionPreset;
pub use registry::{CatalogEntry, SectionCatalog, SupportedSectionType};
