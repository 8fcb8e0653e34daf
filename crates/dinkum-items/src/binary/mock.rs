//! Synthetic object buffers for tests

use super::layout::{behaviour, pptr};
use super::reader::align4;

/// Encode a length-prefixed string padded to a 4-byte boundary
pub fn encode_string(s: &str) -> Vec<u8> {
    let mut out = (s.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(s.as_bytes());
    out.resize(align4(out.len()), 0);
    out
}

/// Encode a PPtr entry
pub fn encode_pptr(file_id: i32, path_id: i64) -> Vec<u8> {
    let mut out = file_id.to_le_bytes().to_vec();
    out.extend_from_slice(&path_id.to_le_bytes());
    debug_assert_eq!(out.len(), pptr::STRIDE);
    out
}

/// Builder for InventoryItem-shaped MonoBehaviour buffers
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    script_id: i64,
    strings: [String; behaviour::HEADER_STRING_FIELDS],
    tail: Vec<u8>,
}

impl RecordBuilder {
    pub fn new(display_name: &str) -> Self {
        Self {
            script_id: 0,
            strings: [
                String::new(),
                "Tool".to_string(),
                display_name.to_string(),
                format!("A {} for testing.", display_name),
            ],
            tail: Vec::new(),
        }
    }

    pub fn script_id(mut self, id: i64) -> Self {
        self.script_id = id;
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.strings[3] = text.to_string();
        self
    }

    /// Zero-filled tail of the given size
    pub fn tail_len(mut self, len: usize) -> Self {
        self.tail.resize(len, 0);
        self
    }

    pub fn byte_at(mut self, offset: usize, value: u8) -> Self {
        if self.tail.len() <= offset {
            self.tail.resize(offset + 1, 0);
        }
        self.tail[offset] = value;
        self
    }

    pub fn i32_at(mut self, offset: usize, value: i32) -> Self {
        if self.tail.len() < offset + 4 {
            self.tail.resize(offset + 4, 0);
        }
        self.tail[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    /// Offset of the tail within the built buffer
    pub fn tail_start(&self) -> usize {
        behaviour::HEADER_SIZE
            + self
                .strings
                .iter()
                .map(|s| align4(4 + s.len()))
                .sum::<usize>()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; behaviour::HEADER_SIZE];
        out[behaviour::SCRIPT_PATH_ID].copy_from_slice(&self.script_id.to_le_bytes());
        for s in &self.strings {
            out.extend(encode_string(s));
        }
        out.extend_from_slice(&self.tail);
        out
    }
}
