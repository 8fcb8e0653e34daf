//! CLI command implementations.

pub mod calibrate;
pub mod extract;
pub mod hexdump;
pub mod inspect;

use anyhow::{Context, Result};
use dinkum_items::{DumpLoader, ExtractionProfile, Extractor, GameFiles, ItemData};
use std::path::Path;

/// Locate the containers and run phases 1 and 2
fn load_item_data(game_dir: &Path, profile: &ExtractionProfile) -> Result<ItemData> {
    let files = GameFiles::locate(game_dir, profile)
        .with_context(|| format!("Failed to locate game files in {}", game_dir.display()))?;
    Ok(Extractor::new(&DumpLoader, profile).load(&files)?)
}
