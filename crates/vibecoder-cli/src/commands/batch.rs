use super::BatchArgs;
use super::effects::PrintSideEffects;
use super::input::{read_ops, read_sections};
use anyhow::{Context, Result};
use std::path::Path;
use vibecoder_core::catalog::SectionCatalog;
use vibecoder_core::config::VibecoderConfig;
use vibecoder_core::editor::SectionEditor;

fn open_editor(
    batch: &BatchArgs,
    config: &VibecoderConfig,
    profile: Option<&str>,
) -> Result<SectionEditor> {
    let list = read_sections(&batch.sections, profile)?;
    Ok(SectionEditor::new(list, config, SectionCatalog::shared()))
}

pub fn validate(batch: &BatchArgs, config: &VibecoderConfig) -> Result<()> {
    let editor = open_editor(batch, config, None)?;
    let ops = read_ops(&batch.ops)?;
    let results = editor.validate(&ops);

    for (index, (op, result)) in ops.iter().zip(&results).enumerate() {
        if result.valid {
            println!("{:>3} {:<18} ok", index + 1, op.kind());
        } else {
            println!("{:>3} {:<18} {}", index + 1, op.kind(), result.errors.join("; "));
        }
    }

    let rejected = results.iter().filter(|r| !r.valid).count();
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} operations rejected", ops.len());
    }
    Ok(())
}

pub fn preview(batch: &BatchArgs, config: &VibecoderConfig) -> Result<()> {
    let editor = open_editor(batch, config, None)?;
    let ops = read_ops(&batch.ops)?;
    let sections = editor.preview(&ops)?;
    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

pub async fn apply(
    batch: &BatchArgs,
    config: &VibecoderConfig,
    out: Option<&Path>,
    profile: Option<&str>,
) -> Result<()> {
    let mut editor = open_editor(batch, config, profile)?;
    let ops = read_ops(&batch.ops)?;
    let report = editor.commit(&ops, &PrintSideEffects)?;

    let json = serde_json::to_string_pretty(editor.sections())?;
    match out {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                target: "vibecoder::editor",
                path = %path.display(),
                created = report.created_ids.len(),
                "Wrote section list"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn inverse(batch: &BatchArgs, config: &VibecoderConfig) -> Result<()> {
    let mut editor = open_editor(batch, config, None)?;
    let ops = read_ops(&batch.ops)?;
    let report = editor.commit(&ops, &PrintSideEffects)?;
    println!("{}", serde_json::to_string_pretty(&report.inverse)?);
    Ok(())
}
