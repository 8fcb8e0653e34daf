//! Item database assembly and JSON export

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::extract::FieldExtraction;
use crate::names::NameTable;
use crate::profile::OverrideTable;

/// Version string recorded in every exported document
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One exported item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stack: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_durability: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMeta {
    pub extracted_at: DateTime<Utc>,
    pub total_items: usize,
    pub total_items_with_durability: usize,
    pub script_version: String,
}

/// The exported document; items are keyed by numeric index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDatabase {
    pub meta: ExtractionMeta,
    pub items: BTreeMap<u32, ItemEntry>,
}

/// Durability for one item: an override always wins, otherwise a tool's
/// positive max stack
pub fn max_durability(
    index: u32,
    fields: &FieldExtraction,
    overrides: &OverrideTable,
) -> Option<i32> {
    if let Some(durability) = overrides.get(index) {
        return Some(durability);
    }
    let item = fields.get(index)?;
    (item.is_tool && item.max_stack > 0).then_some(item.max_stack)
}

/// Merge names and extracted fields into the export document.
///
/// Items without a name are dropped.
pub fn assemble(
    names: &NameTable,
    fields: &FieldExtraction,
    overrides: &OverrideTable,
    extracted_at: DateTime<Utc>,
) -> ItemDatabase {
    let items: BTreeMap<u32, ItemEntry> = names
        .iter()
        .map(|(index, name)| {
            let entry = ItemEntry {
                name: name.to_string(),
                max_stack: fields.max_stack(index),
                max_durability: max_durability(index, fields, overrides),
            };
            (index, entry)
        })
        .collect();

    let with_durability = items
        .values()
        .filter(|e| e.max_durability.is_some())
        .count();

    ItemDatabase {
        meta: ExtractionMeta {
            extracted_at,
            total_items: items.len(),
            total_items_with_durability: with_durability,
            script_version: TOOL_VERSION.to_string(),
        },
        items,
    }
}

impl ItemDatabase {
    pub fn durability_items(&self) -> impl Iterator<Item = (u32, &ItemEntry, i32)> + '_ {
        self.items
            .iter()
            .filter_map(|(&index, entry)| entry.max_durability.map(|d| (index, entry, d)))
    }

    /// Pretty JSON with a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the document, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
