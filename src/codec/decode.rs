// Recursive binary decoder: byte buffer -> flat block sequence

use super::{CodecError, Result};
use crate::block::{Block, BlockData, Tag, HEADER_SIZE};
use crate::wire::{read_u32_be, Fourcc};

/// The format nests two levels deep (`AQLV` around `HEAD`/`BODY`); anything
/// past this bound is a malformed file, not data, and must not recurse until
/// the stack runs out.
const MAX_DEPTH: usize = 16;

/// Decode a whole TS file held in memory into its flat block sequence.
///
/// The buffer must open with an `AQLV` block. Any structural error aborts the
/// decode; no partial tree is returned.
pub fn parse_file(data: &[u8]) -> Result<Vec<Block>> {
    if data.len() < HEADER_SIZE as usize {
        return Err(CodecError::ShortHeader {
            remaining: data.len(),
        });
    }
    let magic = Fourcc([data[0], data[1], data[2], data[3]]);
    if magic != Tag::Aqlv.fourcc() {
        return Err(CodecError::BadMagic(magic));
    }
    let mut blocks = Vec::new();
    parse_blocks(data, &mut blocks, 0)?;
    Ok(blocks)
}

/// Parse one run of sibling blocks. Container markers recurse into their own
/// `size` bytes, so the output stays in wire (pre-order) order.
fn parse_blocks(mut buf: &[u8], out: &mut Vec<Block>, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(CodecError::NestingTooDeep(MAX_DEPTH));
    }
    while !buf.is_empty() {
        if buf.len() < HEADER_SIZE as usize {
            return Err(CodecError::ShortHeader {
                remaining: buf.len(),
            });
        }
        let fourcc = Fourcc([buf[0], buf[1], buf[2], buf[3]]);
        let tag = Tag::from_fourcc(fourcc).ok_or(CodecError::UnknownTag(fourcc))?;
        let declared = read_u32_be(&buf[4..8])? as usize;
        buf = &buf[HEADER_SIZE as usize..];

        // An oversized declared length is tolerated: clamp to what is left.
        let size = if declared > buf.len() {
            tracing::warn!(
                "Block '{}' size truncated from {} to {} bytes",
                tag,
                declared,
                buf.len()
            );
            buf.len()
        } else {
            declared
        };

        let payload = &buf[..size];
        if tag.is_container() {
            out.push(Block {
                tag,
                size: size as u32,
                data: BlockData::Marker,
            });
            parse_blocks(payload, out, depth + 1)?;
        } else {
            let data = BlockData::parse(tag, payload)?;
            out.push(Block {
                tag,
                size: size as u32,
                data,
            });
        }
        buf = &buf[size..];
    }
    Ok(())
}
