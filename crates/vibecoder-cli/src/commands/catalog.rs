use anyhow::Result;
use vibecoder_core::catalog::SectionCatalog;

pub fn run(json: bool) -> Result<()> {
    let catalog = SectionCatalog::standard();

    if json {
        let entries: Vec<_> = catalog.entries().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in catalog.entries() {
        let presets: Vec<&str> = entry.presets.iter().map(|p| p.id.as_str()).collect();
        println!(
            "{:<14} {:<18} {:<12} {}",
            entry.section_type.as_ref(),
            entry.name,
            entry.category.as_ref(),
            presets.join(", ")
        );
    }
    Ok(())
}
