// Four-character block codes as they appear on the wire

use std::fmt;

/// A 4-byte ASCII code identifying a block type or sample format.
///
/// The TS format is big-endian by definition, so a `Fourcc` is stored in wire
/// order and never byte-swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fourcc(pub [u8; 4]);

impl Fourcc {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    /// Build a fourcc from the first four bytes of a text line, right-padded
    /// with spaces. `"END"` in an edited text file still matches `"END "`.
    pub fn from_line(line: &str) -> Self {
        let mut bytes = [b' '; 4];
        for (dst, src) in bytes.iter_mut().zip(line.bytes()) {
            *dst = src;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii() && !b.is_ascii_control() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, ".")?;
            }
        }
        Ok(())
    }
}
