// Block tree model: tags, records, and typed leaf payloads

pub mod fields;
pub mod tag;

pub use fields::{Alvl, BlockData, Cnst, Fbin, IqPair, Mcda, Scal, Sign, Swep};
pub use tag::Tag;

use thiserror::Error;

/// Size of the (tag, size) header that precedes every block on the wire.
pub const HEADER_SIZE: u32 = 8;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Block '{tag}' is truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        tag: Tag,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, BlockError>;

/// One record of the flat block sequence.
///
/// Nesting is implicit: container markers (`AQLV`, `HEAD`, `BODY`, `END `) are
/// ordinary entries whose `size` covers the records that follow them, up to
/// their structural boundary. The canonical wire order is
/// `AQLV, HEAD, <header children>, BODY, <body children>, END `.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tag: Tag,
    /// Payload byte count, excluding this block's own 8-byte header.
    pub size: u32,
    pub data: BlockData,
}

impl Block {
    /// A container marker record. Its size starts at zero and is backpatched
    /// once the whole tree is known.
    pub fn marker(tag: Tag) -> Self {
        debug_assert!(tag.is_container());
        Self {
            tag,
            size: 0,
            data: BlockData::Marker,
        }
    }

    /// A leaf record; size is the payload's wire length.
    pub fn leaf(tag: Tag, data: BlockData) -> Self {
        let size = data.wire_size();
        Self { tag, size, data }
    }
}
