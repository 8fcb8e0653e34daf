//! Hexdump formatting.
//!
//! ```text
//! 0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use std::fmt::Write;

/// Format `bytes` as hexdump rows, labelling offsets from `base`
pub fn format_rows(bytes: &[u8], base: usize) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| format_row(chunk, base + i * 16))
        .collect()
}

fn format_row(chunk: &[u8], offset: usize) -> String {
    let mut line = format!("0x{:03X}: ", offset);

    for j in 0..16 {
        if j == 8 {
            line.push(' ');
        }
        match chunk.get(j) {
            Some(byte) => {
                let _ = write!(line, "{:02X} ", byte);
            }
            None => line.push_str("   "),
        }
    }

    line.push_str(" |");
    for &byte in chunk {
        if (0x20..0x7F).contains(&byte) {
            line.push(byte as char);
        } else {
            line.push('.');
        }
    }
    for _ in chunk.len()..16 {
        line.push(' ');
    }
    line.push('|');
    line
}
