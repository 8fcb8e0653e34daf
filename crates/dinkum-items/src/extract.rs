//! Per-item field extraction using calibrated offsets.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::binary::ReadBytes;
use crate::calibrate::CalibratedOffsets;
use crate::error::Result;
use crate::record::{RecordStore, tail_start};
use crate::reference::ReferenceTable;

/// Fields read from one item record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFields {
    pub is_tool: bool,
    pub max_stack: i32,
}

impl ItemFields {
    /// Read both fields from a record buffer
    pub fn read(raw: &[u8], offsets: &CalibratedOffsets) -> Result<Self> {
        let tail = tail_start(raw)?;
        let max_stack = raw.read_i32(tail + offsets.max_stack)?;
        let is_tool = raw.read_u8(tail + offsets.tool)? == 1;
        Ok(Self { is_tool, max_stack })
    }
}

/// Result of the extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldExtraction {
    pub fields: BTreeMap<u32, ItemFields>,
    /// Records skipped because they were too short or malformed
    pub parse_errors: usize,
    /// Indices with no item record behind them (included in `parse_errors`)
    pub unresolved: usize,
}

impl FieldExtraction {
    pub fn get(&self, index: u32) -> Option<ItemFields> {
        self.fields.get(&index).copied()
    }

    pub fn tool_count(&self) -> usize {
        self.fields.values().filter(|f| f.is_tool).count()
    }

    pub fn is_tool(&self, index: u32) -> bool {
        self.get(index).is_some_and(|f| f.is_tool)
    }

    pub fn max_stack(&self, index: u32) -> Option<i32> {
        self.get(index).map(|f| f.max_stack)
    }
}

/// Read tool flag and max stack for every index in `0..item_count`.
///
/// Bad records are counted and skipped; the pass itself never fails.
pub fn extract_fields(
    item_count: usize,
    references: &ReferenceTable,
    records: &RecordStore,
    offsets: &CalibratedOffsets,
) -> FieldExtraction {
    let mut result = FieldExtraction::default();

    for index in 0..item_count as u32 {
        let Some(raw) = references
            .get(index)
            .and_then(|path_id| records.get(path_id))
        else {
            result.unresolved += 1;
            result.parse_errors += 1;
            continue;
        };

        match ItemFields::read(raw, offsets) {
            Ok(fields) => {
                result.fields.insert(index, fields);
            }
            Err(e) => {
                debug!("Skipping item {}: {}", index, e);
                result.parse_errors += 1;
            }
        }
    }

    if result.parse_errors > 0 {
        info!(
            "Skipped {} items with unexpected data layout ({} without a record)",
            result.parse_errors, result.unresolved
        );
    }
    result
}
