//! Domain layer of the Vibecoder page builder.
//!
//! Sections, the section catalog, the operation protocol (validation,
//! application, preview and inverse), undo history, the conversation model
//! and the asset model. Nothing here performs I/O; persistence, the AI
//! transport and asset generation are traits implemented by the
//! infrastructure crate.

pub mod asset;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod editor;
pub mod error;
pub mod history;
pub mod operation;
pub mod section;

pub use error::{Result, VibeError};

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
