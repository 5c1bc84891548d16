// Binary encoder: flat block sequence -> wire bytes

use super::Result;
use crate::block::Block;
use std::io::Write;

/// Serialize blocks to the big-endian wire format.
///
/// Each record writes its 8-byte header followed by its payload; markers
/// contribute header only, their content being the records that follow.
/// The sequence must already be in canonical flat order with marker sizes
/// backpatched; no reordering or nesting validation happens here.
pub fn write_blocks(blocks: &[Block], out: &mut impl Write) -> Result<()> {
    for block in blocks {
        out.write_all(block.tag.fourcc().as_bytes())?;
        out.write_all(&block.size.to_be_bytes())?;
        out.write_all(&block.data.to_bytes())?;
    }
    Ok(())
}
