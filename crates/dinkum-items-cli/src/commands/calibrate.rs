//! Calibrate command implementation.

use super::load_item_data;
use anyhow::Result;
use dinkum_items::{DumpLoader, ExtractionProfile, Extractor};

/// Run the calibrate command
pub fn run(game_dir: &std::path::Path, profile: &ExtractionProfile) -> Result<()> {
    let data = load_item_data(game_dir, profile)?;
    let offsets = Extractor::new(&DumpLoader, profile).calibrate(&data)?;
    println!("{}", serde_json::to_string_pretty(&offsets)?);
    Ok(())
}
