//! File storage primitives shared by the repositories.

mod atomic_json;
mod section_document;

pub use atomic_json::AtomicJsonFile;
pub(crate) use section_document::SectionDocument;

#[cfg(test)]
pub(crate) use section_document::tests as section_document_tests;
