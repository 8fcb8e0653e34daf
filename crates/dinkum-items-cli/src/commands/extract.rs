//! Extract command implementation.

use super::load_item_data;
use anyhow::{Context, Result};
use dinkum_items::{DumpLoader, ExtractionProfile, ExtractionReport, Extractor};
use owo_colors::OwoColorize;
use std::path::Path;

/// Run the extract command
///
/// Nothing is written unless every phase succeeds.
pub fn run(game_dir: &Path, output: &Path, profile: &ExtractionProfile) -> Result<()> {
    let data = load_item_data(game_dir, profile)?;
    let report = Extractor::new(&DumpLoader, profile).process(&data)?;

    print_summary(&report);
    print_warnings(&report);

    report
        .database
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Output: {}", output.display());
    Ok(())
}

fn print_summary(report: &ExtractionReport) {
    let meta = &report.database.meta;
    println!();
    println!("Extraction complete:");
    println!("  Items:            {}", meta.total_items);
    println!("  With durability:  {}", meta.total_items_with_durability);
    println!("  Tools:            {}", report.fields.tool_count());
    println!("  maxStack values:  {}", report.fields.fields.len());
    println!(
        "  Offsets:          maxStack +{}, isATool +{}",
        report.offsets.max_stack, report.offsets.tool
    );
    if report.fields.parse_errors > 0 {
        println!(
            "  Skipped records:  {} ({} unresolved)",
            report.fields.parse_errors, report.fields.unresolved
        );
    }
}

fn print_warnings(report: &ExtractionReport) {
    if report.warnings.is_empty() {
        println!("{}", "All validation checks passed".green());
        return;
    }
    eprintln!();
    eprintln!("{}", format!("{} validation warnings:", report.warnings.len()).yellow());
    for warning in &report.warnings {
        eprintln!("  {} {}", "WARNING:".yellow().bold(), warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_game_dir_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let game_dir = dir.path().join("no-such-install");
        let output = dir.path().join("out").join("items.json");

        let err = run(&game_dir, &output, &ExtractionProfile::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to locate game files"));
        assert!(!output.exists());
        assert!(!output.parent().unwrap().exists());
    }

    #[test]
    fn test_incomplete_install_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("Dinkum_Data");
        std::fs::create_dir_all(data_dir.join("resources.assets")).unwrap();
        let output = dir.path().join("items.json");

        assert!(run(dir.path(), &output, &ExtractionProfile::default()).is_err());
        assert!(!output.exists());
    }
}
