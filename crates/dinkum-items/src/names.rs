//! Item names from the I2 Localization term table.
//!
//! Terms are serialized as a length-prefixed key such as
//! `InventoryItemNames/InvItem_123` followed, somewhere in the next few
//! hundred bytes, by the translated strings. The English name is taken to be
//! the first printable length-prefixed string after the key.

use std::collections::BTreeMap;

use memchr::memmem;
use tracing::debug;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::binary::layout::STRING_PREFIX;
use crate::binary::layout::names::{MAX_LEN_EXCLUSIVE, MIN_LEN_EXCLUSIVE, VALUE_WINDOW};
use crate::binary::{ReadBytes, align4};
use crate::error::{Error, Result};

/// Item id -> display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: BTreeMap<u32, String>,
    duplicates: Vec<u32>,
}

impl NameTable {
    pub fn get(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.names.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Ids whose key appeared more than once; the last occurrence was kept
    pub fn duplicates(&self) -> &[u32] {
        &self.duplicates
    }

    fn insert(&mut self, id: u32, name: String) {
        if self.names.insert(id, name).is_some() {
            self.duplicates.push(id);
        }
    }
}

impl FromIterator<(u32, String)> for NameTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        let mut table = NameTable::default();
        for (id, name) in iter {
            table.insert(id, name);
        }
        table
    }
}

/// Scan a localization buffer for `<namespace><id>` keys and their names
pub fn scan_name_table(raw: &[u8], namespace: &str) -> Result<NameTable> {
    let prefix = namespace.as_bytes();
    let token = namespace.split('/').next().unwrap_or(namespace);
    let mut table = NameTable::default();
    let mut matches = 0usize;

    for start in memmem::find_iter(raw, prefix) {
        matches += 1;
        let Some(id) = parse_id(&raw[start + prefix.len()..]) else {
            continue;
        };
        let Some(value_start) = key_end(raw, start) else {
            debug!("Term key for item {} has no readable length prefix", id);
            continue;
        };
        match find_name(raw, value_start, token) {
            Some(name) => table.insert(id, name),
            None => debug!("No display name found for item {}", id),
        }
    }

    if matches == 0 {
        return Err(Error::StructuralAnchorMissing(format!(
            "localization key namespace '{}' not present",
            namespace
        )));
    }
    if !table.duplicates.is_empty() {
        debug!("Duplicate localization keys: {:?}", table.duplicates);
    }
    Ok(table)
}

/// Decimal id immediately following the key prefix
fn parse_id(rest: &[u8]) -> Option<u32> {
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    std::str::from_utf8(&rest[..digits]).ok()?.parse().ok()
}

/// End of the key string whose payload starts at `start`, rounded up to the
/// next absolute 4-byte boundary of the buffer
fn key_end(raw: &[u8], start: usize) -> Option<usize> {
    let prefix_at = start.checked_sub(STRING_PREFIX)?;
    let key_len = raw.read_u32(prefix_at).ok()? as usize;
    Some(align4(start + key_len))
}

/// First plausible length-prefixed name within the value window
fn find_name(raw: &[u8], from: usize, token: &str) -> Option<String> {
    let window_end = (from + VALUE_WINDOW).min(raw.len());
    let mut pos = from;
    while pos + 4 < window_end {
        if let Some(name) = candidate_at(raw, pos, token) {
            return Some(strip_placeholders(&name));
        }
        pos += 1;
    }
    None
}

fn candidate_at(raw: &[u8], pos: usize, token: &str) -> Option<String> {
    let len = raw.read_u32(pos).ok()?;
    if len <= MIN_LEN_EXCLUSIVE || len >= MAX_LEN_EXCLUSIVE {
        return None;
    }
    let payload = raw.read_bytes(pos + STRING_PREFIX, len as usize).ok()?;
    let text = std::str::from_utf8(payload).ok()?;
    if !is_printable(text) || text.starts_with(token) {
        return None;
    }
    Some(text.to_string())
}

/// Printable text: no separators other than a plain space, and no control,
/// format, private-use or unassigned code points
fn is_printable(text: &str) -> bool {
    text.chars().all(|c| {
        c == ' '
            || !matches!(
                get_general_category(c),
                GeneralCategory::Control
                    | GeneralCategory::Format
                    | GeneralCategory::Surrogate
                    | GeneralCategory::PrivateUse
                    | GeneralCategory::Unassigned
                    | GeneralCategory::SpaceSeparator
                    | GeneralCategory::LineSeparator
                    | GeneralCategory::ParagraphSeparator
            )
    })
}

/// Remove I2 pluralization markers such as `{s}` or `{[COUNT]}`
pub fn strip_placeholders(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::mock::encode_string;

    const NS: &str = "InventoryItemNames/InvItem_";

    fn term(id: u32, values: &[&str]) -> Vec<u8> {
        let mut out = encode_string(&format!("{}{}", NS, id));
        // Term type and description fields that precede the translations
        out.extend(0u32.to_le_bytes());
        out.extend(encode_string(""));
        out.extend((values.len() as u32).to_le_bytes());
        for v in values {
            out.extend(encode_string(v));
        }
        out
    }

    fn buffer(terms: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![0u8; 16];
        for t in terms {
            out.extend_from_slice(t);
        }
        out.extend(vec![0u8; 32]);
        out
    }

    #[test]
    fn test_scan_basic_names() {
        let raw = buffer(&[
            term(0, &["Basic Axe", "Hacha"]),
            term(1, &["Megaphone"]),
            term(119, &["First Aid Kit"]),
        ]);
        let table = scan_name_table(&raw, NS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("Basic Axe"));
        assert_eq!(table.get(1), Some("Megaphone"));
        assert_eq!(table.get(119), Some("First Aid Kit"));
        assert!(table.duplicates().is_empty());
    }

    #[test]
    fn test_scan_strips_plural_markers() {
        let raw = buffer(&[term(12, &["Bag{s} of Cement"]), term(13, &["BBQ{[COUNT]}"])]);
        let table = scan_name_table(&raw, NS).unwrap();
        assert_eq!(table.get(12), Some("Bag of Cement"));
        assert_eq!(table.get(13), Some("BBQ"));
    }

    #[test]
    fn test_scan_skips_degenerate_and_namespace_strings() {
        // One-byte value, then a string that starts with the namespace token
        let mut t = encode_string(&format!("{}{}", NS, 17));
        t.extend(encode_string("x"));
        t.extend(encode_string("InventoryItemNames/Other"));
        t.extend(encode_string("Bush Lime"));
        let table = scan_name_table(&buffer(&[t]), NS).unwrap();
        assert_eq!(table.get(17), Some("Bush Lime"));
    }

    #[test]
    fn test_scan_skips_unprintable_candidates() {
        let mut t = encode_string(&format!("{}{}", NS, 3));
        t.extend(encode_string("Chain\nsaw"));
        t.extend(encode_string("Chainsaw"));
        let table = scan_name_table(&buffer(&[t]), NS).unwrap();
        assert_eq!(table.get(3), Some("Chainsaw"));
    }

    #[test]
    fn test_scan_window_is_bounded() {
        let mut t = encode_string(&format!("{}{}", NS, 5));
        t.extend(vec![0u8; VALUE_WINDOW + 8]);
        t.extend(encode_string("Too Far Away"));
        let table = scan_name_table(&buffer(&[t]), NS).unwrap();
        assert_eq!(table.get(5), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_scan_duplicate_ids_last_wins() {
        let raw = buffer(&[term(7, &["Old Name"]), term(7, &["New Name"])]);
        let table = scan_name_table(&raw, NS).unwrap();
        assert_eq!(table.get(7), Some("New Name"));
        assert_eq!(table.duplicates(), &[7]);
    }

    #[test]
    fn test_scan_missing_namespace_is_fatal() {
        let raw = buffer(&[]);
        let err = scan_name_table(&raw, NS).unwrap_err();
        assert!(matches!(err, Error::StructuralAnchorMissing(_)));
    }

    #[test]
    fn test_scan_non_ascii_name() {
        let raw = buffer(&[term(40, &["Caf\u{e9} Table"])]);
        let table = scan_name_table(&raw, NS).unwrap();
        assert_eq!(table.get(40), Some("Caf\u{e9} Table"));
    }

    #[test]
    fn test_scan_rejects_invisible_characters() {
        let mut t = encode_string(&format!("{}{}", NS, 8));
        t.extend(encode_string("Soft\u{ad}Hyphen"));
        t.extend(encode_string("Zero\u{200b}Width"));
        t.extend(encode_string("Private\u{e000}Use"));
        t.extend(encode_string("Non\u{a0}Break"));
        t.extend(encode_string("Fishing Rod"));
        let table = scan_name_table(&buffer(&[t]), NS).unwrap();
        assert_eq!(table.get(8), Some("Fishing Rod"));
    }

    #[test]
    fn test_is_printable() {
        assert!(is_printable("Caf\u{e9} Table"));
        assert!(is_printable("\u{30d0}\u{30b1}\u{30c4}"));
        assert!(!is_printable("Tab\there"));
        assert!(!is_printable("Soft\u{ad}Hyphen"));
        assert!(!is_printable("Unassigned\u{378}"));
    }

    #[test]
    fn test_key_end_aligns_absolute_offset() {
        // Key payload starts at 6, so it ends at 35 and the value starts at 36
        let key = format!("{}{}", NS, 12);
        assert_eq!(key.len(), 29);
        let mut raw = vec![0u8; 2];
        raw.extend((key.len() as u32).to_le_bytes());
        raw.extend(key.as_bytes());
        raw.push(0);
        assert_eq!(raw.len(), 36);
        raw.extend(encode_string("Basic Axe"));
        raw.extend([0u8; 16]);

        assert_eq!(key_end(&raw, 6), Some(36));
        let table = scan_name_table(&raw, NS).unwrap();
        assert_eq!(table.get(12), Some("Basic Axe"));
    }

    #[test]
    fn test_strip_placeholders() {
        assert_eq!(strip_placeholders("Axe"), "Axe");
        assert_eq!(strip_placeholders("Seed{s}"), "Seed");
        assert_eq!(strip_placeholders("{a}B{c}D"), "BD");
        assert_eq!(strip_placeholders("Open {brace"), "Open {brace");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(b"123\0"), Some(123));
        assert_eq!(parse_id(b"x1"), None);
        assert_eq!(parse_id(b"99999999999"), None);
    }
}
