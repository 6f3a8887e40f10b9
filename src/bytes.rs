//! Immutable byte sequences with big-endian integer views.

use std::fmt;

use anyhow::{ensure, Context, Result};

/// An immutable sequence of bytes.
///
/// Frames move through the pipeline as `ByteString`s so that downstream
/// consumers can hold on to them without worrying about aliasing the
/// demodulator's scratch buffers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteString {
    bytes: Box<[u8]>,
}

impl ByteString {
    /// Copies `bytes` into a new immutable byte string.
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Parses an even-length hexadecimal string into a byte string.
    pub fn of_hex(hex_string: &str) -> Result<Self> {
        ensure!(
            hex_string.len() % 2 == 0,
            "hexadecimal string must have even length"
        );
        let bytes = hex::decode(hex_string).context("invalid hexadecimal string")?;
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// Number of bytes in the sequence.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The unsigned byte at `index`.
    pub fn byte_at(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes in `from..to` interpreted as a big-endian unsigned integer.
    ///
    /// The range must span fewer than 8 bytes so the result fits in a `u64`
    /// without truncation.
    pub fn bytes_in_range(&self, from: usize, to: usize) -> u64 {
        assert!(from <= to && to <= self.bytes.len(), "byte range out of bounds");
        assert!(to - from < 8, "byte range too wide for a 64-bit value");
        self.bytes[from..to]
            .iter()
            .fold(0u64, |value, &byte| (value << 8) | u64::from(byte))
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.bytes))
    }
}

// Frames read best as uppercase hex, in debug output too.
impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_hex_round_trip() {
        let bytes = ByteString::of_hex("8D4B17E5991108AECDA07D743C27").unwrap();
        assert_eq!(bytes.len(), 14);
        assert_eq!(bytes.to_string(), "8D4B17E5991108AECDA07D743C27");
    }

    #[test]
    fn test_of_hex_rejects_odd_length() {
        assert!(ByteString::of_hex("8D4").is_err());
    }

    #[test]
    fn test_byte_at() {
        let bytes = ByteString::new(&[0x8D, 0x4B, 0xFF]);
        assert_eq!(bytes.byte_at(0), 0x8D);
        assert_eq!(bytes.byte_at(2), 0xFF);
    }

    #[test]
    fn test_bytes_in_range_is_big_endian() {
        let bytes = ByteString::new(&[0x8D, 0x4B, 0x17, 0xE5]);
        assert_eq!(bytes.bytes_in_range(1, 4), 0x4B17E5);
        assert_eq!(bytes.bytes_in_range(0, 1), 0x8D);
        assert_eq!(bytes.bytes_in_range(2, 2), 0);
    }
}
