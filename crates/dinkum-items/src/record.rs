//! Raw InventoryItem records and the per-record header walk.

use std::collections::HashMap;

use crate::binary::layout::behaviour;
use crate::binary::ReadBytes;
use crate::error::Result;

/// Locate the start of a record's fixed-size tail.
///
/// Skips the MonoBehaviour header and the four variable-length strings that
/// precede the tail. The result depends on the string lengths, so it must be
/// computed for each record separately.
pub fn tail_start(raw: &[u8]) -> Result<usize> {
    let mut pos = behaviour::HEADER_SIZE;
    for _ in 0..behaviour::HEADER_STRING_FIELDS {
        pos = raw.skip_string(pos)?;
    }
    Ok(pos)
}

/// Script path id referenced by a MonoBehaviour, if the buffer is long enough
/// to carry a full header
pub fn script_path_id(raw: &[u8]) -> Option<i64> {
    if raw.len() <= behaviour::HEADER_SIZE {
        return None;
    }
    raw.read_i64(behaviour::SCRIPT_PATH_ID.start).ok()
}

/// Arena of raw record buffers keyed by object path id.
///
/// Buffers are never modified after insertion.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: HashMap<i64, Vec<u8>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path_id: i64, raw: Vec<u8>) {
        self.records.insert(path_id, raw);
    }

    pub fn get(&self, path_id: i64) -> Option<&[u8]> {
        self.records.get(&path_id).map(Vec::as_slice)
    }

    pub fn contains(&self, path_id: i64) -> bool {
        self.records.contains_key(&path_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.keys().copied()
    }
}

impl FromIterator<(i64, Vec<u8>)> for RecordStore {
    fn from_iter<I: IntoIterator<Item = (i64, Vec<u8>)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
