// Size backpatching: container sizes are unknowable until the tree is whole

use super::{CodecError, Result};
use crate::block::{Block, Tag, HEADER_SIZE};

/// Compute and write the three container sizes into an assembled tree.
///
/// Runs after text parsing, before binary encoding. The invariants:
/// - `HEAD.size` = sum of `(8 + size)` over records strictly between `HEAD`
///   and the next `BODY` or `END `
/// - `BODY.size` = the same sum between `BODY` and the next `END `
/// - `AQLV.size` = `HEAD.size + 8 + BODY.size + 8`
///
/// A tree missing any of the three markers cannot be serialized.
pub fn fixup_sizes(blocks: &mut [Block]) -> Result<()> {
    let head_size = section_size(blocks, Tag::Head, &[Tag::Body, Tag::End]);
    let body_size = section_size(blocks, Tag::Body, &[Tag::End]);
    let aqlv_size = head_size + HEADER_SIZE + body_size + HEADER_SIZE;
    set_block_size(blocks, Tag::Aqlv, aqlv_size)?;
    set_block_size(blocks, Tag::Head, head_size)?;
    set_block_size(blocks, Tag::Body, body_size)?;
    Ok(())
}

/// Linear scan with an inside-region flag: toggled on by `opener`, off by any
/// of `closers`, accumulating header-plus-payload sizes while set.
fn section_size(blocks: &[Block], opener: Tag, closers: &[Tag]) -> u32 {
    let mut inside = false;
    let mut size = 0u32;
    for block in blocks {
        if closers.contains(&block.tag) {
            inside = false;
        }
        if inside {
            size += HEADER_SIZE + block.size;
        }
        if block.tag == opener {
            inside = true;
        }
    }
    size
}

fn set_block_size(blocks: &mut [Block], tag: Tag, size: u32) -> Result<()> {
    for block in blocks.iter_mut() {
        if block.tag == tag {
            block.size = size;
            return Ok(());
        }
    }
    Err(CodecError::MissingMarker(tag))
}
