pub mod batch;
pub mod catalog;
mod effects;
mod input;

use clap::Args;
use std::path::{Path, PathBuf};
use vibecoder_core::config::VibecoderConfig;
use vibecoder_infrastructure::ConfigService;

/// Input files shared by the batch commands.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// JSON array of sections
    #[arg(long)]
    pub sections: PathBuf,
    /// JSON array of operations, or an AI reply with an `ops` field
    #[arg(long)]
    pub ops: PathBuf,
}

pub fn load_config(path: Option<&Path>) -> VibecoderConfig {
    match path {
        Some(path) => ConfigService::with_path(path).get_config(),
        None => ConfigService::new().get_config(),
    }
}
