//! Path management for Vibecoder files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/vibecoder/          # Config directory
//! ├── config.toml               # Engine configuration
//! ├── sections/                 # One section document per profile
//! │   └── <profile_id>.json
//! └── conversations/            # One conversation log per profile
//!     └── <profile_id>.jsonl
//! ```
//!
//! A custom base directory replaces `~/.config/vibecoder/` (used by tests).

use std::path::{Path, PathBuf};
use vibecoder_core::{Result, VibeError};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "VIBECODER_CONFIG";

#[derive(Debug, Clone, Default)]
pub struct VibecoderPaths {
    base_dir: Option<PathBuf>,
}

impl VibecoderPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// The base directory, e.g. `~/.config/vibecoder/`.
    pub fn base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("vibecoder"))
                .ok_or_else(|| VibeError::config("Cannot find home directory")),
        }
    }

    /// `config.toml`, unless `VIBECODER_CONFIG` points elsewhere.
    pub fn config_file(&self) -> Result<PathBuf> {
        if self.base_dir.is_none() {
            if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(self.base_dir()?.join("config.toml"))
    }

    pub fn sections_dir(&self) -> Result<PathBuf> {
        Ok(self.base_dir()?.join("sections"))
    }

    pub fn conversations_dir(&self) -> Result<PathBuf> {
        Ok(self.base_dir()?.join("conversations"))
    }
}

/// File name for a profile.
///
/// ASCII letters, digits and `-` pass through; every other byte becomes
/// `_XX` (uppercase hex). `_` only ever starts an escape, so distinct ids
/// never share a file.
pub(crate) fn profile_file_name(profile_id: &str, extension: &str) -> String {
    let mut encoded = String::with_capacity(profile_id.len());
    for byte in profile_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("_{byte:02X}"));
        }
    }
    format!("{encoded}.{extension}")
}
