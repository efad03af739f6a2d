//! Engine configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct VibecoderConfig {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Ceilings enforced by the operation validator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LimitsConfig {
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,
    #[serde(default = "default_display_name_max_chars")]
    pub display_name_max_chars: usize,
    #[serde(default = "default_bio_max_chars")]
    pub bio_max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_sections: default_max_sections(),
            display_name_max_chars: default_display_name_max_chars(),
            bio_max_chars: default_bio_max_chars(),
        }
    }
}

fn default_max_sections() -> usize {
    25
}

fn default_display_name_max_chars() -> usize {
    40
}

fn default_bio_max_chars() -> usize {
    160
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Hard timeout for one AI transport call
    #[serde(default = "default_transport_timeout_secs")]
    pub transport_timeout_secs: u64,
    /// Number of prior messages sent to the AI as conversation history
    #[serde(default = "default_history_context_turns")]
    pub history_context_turns: usize,
    /// Messages loaded per transcript page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Suffix appended when a reply is regenerated
    #[serde(default = "default_regenerate_marker")]
    pub regenerate_marker: String,
}

impl SessionConfig {
    pub fn transport_timeout(&self) -> Duration {
        Duration::from_secs(self.transport_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport_timeout_secs: default_transport_timeout_secs(),
            history_context_turns: default_history_context_turns(),
            page_size: default_page_size(),
            regenerate_marker: default_regenerate_marker(),
        }
    }
}

fn default_transport_timeout_secs() -> u64 {
    60
}

fn default_history_context_turns() -> usize {
    10
}

fn default_page_size() -> usize {
    30
}

fn default_regenerate_marker() -> String {
    " [regenerate]".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_max_entries() -> usize {
    50
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssetConfig {
    /// Width/height ratio at or above which an image request becomes a banner
    #[serde(default = "default_wide_aspect_threshold")]
    pub wide_aspect_threshold: f64,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            wide_aspect_threshold: default_wide_aspect_threshold(),
        }
    }
}

fn default_wide_aspect_threshold() -> f64 {
    1.5
}

/// Endpoints for the HTTP adapters. Unset endpoints disable the adapter.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct TransportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}
