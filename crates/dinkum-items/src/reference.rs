//! Item index -> record mapping recovered from the Inventory singleton.
//!
//! The singleton serializes `allItems` as a PPtr array: a u32 count followed
//! by 12-byte entries (i32 file id, i64 path id). Its position is not fixed,
//! so the front of each candidate buffer is probed for a count equal to the
//! number of named items whose first entry points at a known item record.

use tracing::{debug, info};

use crate::binary::ReadBytes;
use crate::binary::layout::pptr;
use crate::error::{Error, Result};
use crate::record::RecordStore;

/// Contiguous index -> path id table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    path_ids: Vec<i64>,
}

impl ReferenceTable {
    pub fn new(path_ids: Vec<i64>) -> Self {
        Self { path_ids }
    }

    pub fn get(&self, index: u32) -> Option<i64> {
        self.path_ids.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.path_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.path_ids
            .iter()
            .enumerate()
            .map(|(index, &path_id)| (index as u32, path_id))
    }

    /// Number of indices whose path id is present in `records`
    pub fn mapped_count(&self, records: &RecordStore) -> usize {
        self.path_ids
            .iter()
            .filter(|&&path_id| records.contains(path_id))
            .count()
    }
}

/// Parameters for the array probe
#[derive(Debug, Clone)]
pub struct ReferenceProbe<'a> {
    /// Array length to look for
    pub expected_count: usize,
    /// Candidate offsets are `0..window`
    pub window: usize,
    /// File ids a plausible first entry may carry
    pub file_ids: &'a [i32],
}

impl ReferenceProbe<'_> {
    /// Probe one buffer; the first accepted offset wins
    pub fn probe(&self, raw: &[u8], records: &RecordStore) -> Option<ReferenceTable> {
        let last = self.window.min(raw.len().saturating_sub(4));
        (0..last).find_map(|offset| self.try_offset(raw, offset, records))
    }

    fn try_offset(&self, raw: &[u8], offset: usize, records: &RecordStore) -> Option<ReferenceTable> {
        let count = raw.read_u32(offset).ok()? as usize;
        if count != self.expected_count {
            return None;
        }

        let entries = offset + 4;
        let file_id = raw.read_i32(entries).ok()?;
        let first = raw.read_i64(entries + pptr::PATH_ID).ok()?;
        if !self.file_ids.contains(&file_id) || !records.contains(first) {
            return None;
        }

        let path_ids = (0..count)
            .map(|i| raw.read_i64(entries + i * pptr::STRIDE + pptr::PATH_ID))
            .collect::<Result<Vec<_>>>();
        match path_ids {
            Ok(path_ids) => {
                debug!("Item array found at offset {} ({} entries)", offset, count);
                Some(ReferenceTable::new(path_ids))
            }
            Err(e) => {
                debug!("Item array candidate at offset {} is truncated: {}", offset, e);
                None
            }
        }
    }
}

/// Resolve the reference table from the first buffer that contains the array
pub fn resolve_reference_table<'r, I>(
    candidates: I,
    probe: &ReferenceProbe<'_>,
    records: &RecordStore,
) -> Result<ReferenceTable>
where
    I: IntoIterator<Item = &'r [u8]>,
{
    let table = candidates
        .into_iter()
        .find_map(|raw| probe.probe(raw, records))
        .ok_or_else(|| {
            Error::StructuralAnchorMissing(format!(
                "item reference array with {} entries not found",
                probe.expected_count
            ))
        })?;

    info!(
        "Mapped {}/{} items to item records",
        table.mapped_count(records),
        table.len()
    );
    Ok(table)
}
