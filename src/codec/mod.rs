// Binary container codec: decode, size backpatching, encode

pub mod decode;
pub mod encode;
pub mod sizes;

pub use decode::parse_file;
pub use encode::write_blocks;
pub use sizes::fixup_sizes;

use crate::block::{BlockError, Tag};
use crate::wire::{Fourcc, WireError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Bad file header: expected AQLV, found '{0}'")]
    BadMagic(Fourcc),

    #[error("Truncated block header: {remaining} bytes remain, need 8")]
    ShortHeader { remaining: usize },

    #[error("Unknown block tag '{0}'")]
    UnknownTag(Fourcc),

    #[error(transparent)]
    Block(#[from] BlockError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("Missing '{0}' marker, tree cannot be serialized")]
    MissingMarker(Tag),

    #[error("Container nesting exceeds {0} levels")]
    NestingTooDeep(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
