use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use vibecoder_core::operation::Operation;
use vibecoder_core::section::{Section, SectionList};

/// Profile id used when the section file is empty and none is given.
const LOCAL_PROFILE: &str = "local";

#[derive(Deserialize)]
#[serde(untagged)]
enum OpsFile {
    Batch(Vec<Operation>),
    Reply { ops: Vec<Operation> },
}

pub fn read_sections(path: &Path, profile: Option<&str>) -> Result<SectionList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sections file {}", path.display()))?;
    let sections: Vec<Section> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid sections file {}", path.display()))?;

    let profile_id = profile
        .map(str::to_string)
        .or_else(|| sections.first().map(|s| s.profile_id.clone()))
        .unwrap_or_else(|| LOCAL_PROFILE.to_string());
    Ok(SectionList::from_sections(profile_id, sections))
}

pub fn read_ops(path: &Path) -> Result<Vec<Operation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ops file {}", path.display()))?;
    parse_ops(&content).with_context(|| format!("Invalid ops file {}", path.display()))
}

fn parse_ops(content: &str) -> Result<Vec<Operation>> {
    let file: OpsFile = serde_json::from_str(content)?;
    Ok(match file {
        OpsFile::Batch(ops) => ops,
        OpsFile::Reply { ops } => ops,
    })
}
