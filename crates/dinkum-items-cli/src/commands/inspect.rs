//! Inspect command implementation.
//!
//! Dumps the fixed-size tail of one item record, which is where calibration
//! looks for fields. Useful when anchors go stale after a game update.

use super::hexdump::format_rows;
use super::load_item_data;
use anyhow::{Context, Result};
use dinkum_items::binary::layout::behaviour;
use dinkum_items::{ExtractionProfile, ItemData, ReadBytes, tail_start};
use std::path::Path;

/// Run the inspect command
pub fn run(game_dir: &Path, index: u32, size: usize, profile: &ExtractionProfile) -> Result<()> {
    let data = load_item_data(game_dir, profile)?;
    for line in describe(&data, index, size)? {
        println!("{}", line);
    }
    Ok(())
}

/// Header lines followed by the tail hexdump
fn describe(data: &ItemData, index: u32, size: usize) -> Result<Vec<String>> {
    let path_id = data
        .references
        .get(index)
        .with_context(|| format!("Item {} is not in the item array", index))?;
    let raw = data
        .records
        .get(path_id)
        .with_context(|| format!("Item {} (path id {}) has no item record", index, path_id))?;
    let tail = tail_start(raw).with_context(|| format!("Item {} has a malformed header", index))?;
    let (object_name, _) = raw.read_string(behaviour::HEADER_SIZE)?;

    let name = data.names.get(index).unwrap_or("<unnamed>");
    let len = size.min(raw.len() - tail);
    let mut lines = vec![
        format!("Item {}: {} ({})", index, name, object_name),
        format!("Path id: {}", path_id),
        format!("Record: {} bytes, tail starts at 0x{:X}", raw.len(), tail),
        String::new(),
    ];
    lines.extend(format_rows(&raw[tail..tail + len], 0));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinkum_items::{NameTable, RecordStore, ReferenceTable};

    fn string(s: &str) -> Vec<u8> {
        let mut out = (s.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out.resize(dinkum_items::align4(out.len()), 0);
        out
    }

    fn data() -> ItemData {
        let mut raw = vec![0u8; behaviour::HEADER_SIZE];
        for s in ["Axe", "Tool", "Basic Axe", "Chops trees."] {
            raw.extend(string(s));
        }
        raw.extend([0x01, 0x00, 0x00, 0x00, 0x96, 0x00, 0x00, 0x00]);

        let names: NameTable = [(0, "Basic Axe".to_string())].into_iter().collect();
        let records: RecordStore = [(42, raw)].into_iter().collect();
        ItemData {
            names,
            records,
            references: ReferenceTable::new(vec![42, 99]),
        }
    }

    #[test]
    fn test_describe_dumps_tail() {
        let lines = describe(&data(), 0, 320).unwrap();
        assert_eq!(lines[0], "Item 0: Basic Axe (Axe)");
        assert_eq!(lines[1], "Path id: 42");
        assert!(lines[2].contains("tail starts at 0x"));
        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with("0x000: 01 00 00 00 96 00 00 00 "));
    }

    #[test]
    fn test_describe_truncates_to_size() {
        let lines = describe(&data(), 0, 2).unwrap();
        assert!(lines[4].starts_with("0x000: 01 00    "));
    }

    #[test]
    fn test_describe_unknown_index() {
        let data = data();
        assert!(describe(&data, 5, 16).is_err());
        let err = describe(&data, 1, 16).unwrap_err();
        assert!(err.to_string().contains("has no item record"));
    }
}
