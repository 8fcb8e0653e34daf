//! Bounds-checked little-endian reads over serialized object buffers.

use super::layout::STRING_PREFIX;
use crate::error::{Error, Result};

/// Round a byte count up to the next multiple of 4
pub const fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// Read access to an immutable byte buffer.
///
/// Every read is bounds-checked; running past the end yields
/// [`Error::MalformedRecord`] instead of panicking.
pub trait ReadBytes {
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]>;

    fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        let bytes = self.read_bytes(offset, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&self, offset: usize) -> Result<i32> {
        let bytes = self.read_bytes(offset, 4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&self, offset: usize) -> Result<i64> {
        let bytes = self.read_bytes(offset, 8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(word))
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// Returns the decoded text (invalid sequences replaced) and the offset
    /// of the next field, aligned to 4 bytes from the length prefix.
    fn read_string(&self, offset: usize) -> Result<(String, usize)> {
        let len = self.read_u32(offset)? as usize;
        let payload = self.read_bytes(offset + STRING_PREFIX, len)?;
        let text = String::from_utf8_lossy(payload).into_owned();
        Ok((text, offset + align4(STRING_PREFIX + len)))
    }

    /// Same offset arithmetic as [`ReadBytes::read_string`] without decoding.
    fn skip_string(&self, offset: usize) -> Result<usize> {
        let len = self.read_u32(offset)? as usize;
        self.read_bytes(offset + STRING_PREFIX, len)?;
        Ok(offset + align4(STRING_PREFIX + len))
    }
}

impl ReadBytes for [u8] {
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.get(offset..end))
            .ok_or(Error::MalformedRecord {
                offset,
                needed: len,
                len: self.len(),
            })
    }
}

impl ReadBytes for Vec<u8> {
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.as_slice().read_bytes(offset, len)
    }
}
