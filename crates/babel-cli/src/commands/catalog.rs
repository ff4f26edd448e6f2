//! The `babel catalog` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use babel_sources::config::{create_loader, load_config_from};

use super::load_catalog;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let loader = create_loader(&config)?;
    let catalog = load_catalog(&loader).await?;

    let mut table = Table::new();
    table.set_header(vec!["Language", "Words", "Audio"]);

    for language in catalog.languages() {
        let records = catalog.records(language).unwrap_or_default();
        let with_audio = records.iter().filter(|r| r.audio_code().is_some()).count();
        let audio = match records.first().and_then(|r| r.audio_code()) {
            Some(code) if with_audio == records.len() => code.to_string(),
            Some(code) => format!("{code} ({with_audio}/{})", records.len()),
            None if with_audio > 0 => format!("partial ({with_audio}/{})", records.len()),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(language),
            Cell::new(records.len()),
            Cell::new(audio),
        ]);
    }

    println!("{table}");
    println!(
        "{} language(s), built {}",
        catalog.len(),
        catalog.built_at().format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !catalog.warnings().is_empty() {
        println!("\n{} source(s) skipped:", catalog.warnings().len());
        for warning in catalog.warnings() {
            println!("  {warning}");
        }
    }

    Ok(())
}
