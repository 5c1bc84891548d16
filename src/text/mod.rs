// Human-editable text representation of the block tree

pub mod dump;
pub mod gen;

pub use dump::dump_blocks;
pub use gen::parse_text;

use crate::block::Tag;
use crate::samples::SampleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextError {
    #[error("Cannot handle block '{tag}' at line {line}")]
    UnknownTag { tag: crate::wire::Fourcc, line: usize },

    #[error("Cannot find parameter '{key}' in '{tag}' block starting at line {line}")]
    MissingParameter { tag: Tag, key: String, line: usize },

    #[error("Bad value for '{key}' at line {line}: {value}")]
    BadValue {
        key: String,
        value: String,
        line: usize,
    },

    #[error("Empty '{tag}' sample block at line {line}")]
    EmptySampleBlock { tag: Tag, line: usize },

    #[error("Odd number of sample lines ({count}) in '{tag}' block at line {line}")]
    OddSampleCount { tag: Tag, count: usize, line: usize },

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
