// Typed payloads for each leaf block, with their wire layouts

use super::tag::Tag;
use super::{BlockError, Result};
use crate::wire::{write_f64_be, write_i16_be, write_i32_be, write_u32_be, Fourcc};
use nom::bytes::complete::take;
use nom::number::complete::{be_f64, be_i16, be_i32, be_u32};
use nom::{IResult, Parser};

pub const SIZE_DESCRIPTION: usize = 64;
pub const SIZE_OWNERNAME: usize = 64;
pub const SIZE_COMMENT: usize = 64;

/// File signature block (`sign`).
#[derive(Debug, Clone, PartialEq)]
pub struct Sign {
    pub version: Fourcc,
    pub filetype: Fourcc,
    pub sitecode: Fourcc,
    pub userflags: u32,
    pub description: [u8; SIZE_DESCRIPTION],
    pub ownername: [u8; SIZE_OWNERNAME],
    pub comment: [u8; SIZE_COMMENT],
}

impl Sign {
    pub const WIRE_SIZE: u32 = 16 + (SIZE_DESCRIPTION + SIZE_OWNERNAME + SIZE_COMMENT) as u32;

    fn parse(input: &[u8]) -> IResult<&[u8], Sign> {
        let (input, version) = fourcc(input)?;
        let (input, filetype) = fourcc(input)?;
        let (input, sitecode) = fourcc(input)?;
        let (input, userflags) = be_u32(input)?;
        let (input, description) = byte_string::<SIZE_DESCRIPTION>(input)?;
        let (input, ownername) = byte_string::<SIZE_OWNERNAME>(input)?;
        let (input, comment) = byte_string::<SIZE_COMMENT>(input)?;
        Ok((
            input,
            Sign {
                version,
                filetype,
                sitecode,
                userflags,
                description,
                ownername,
                comment,
            },
        ))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.version.as_bytes());
        out.extend_from_slice(self.filetype.as_bytes());
        out.extend_from_slice(self.sitecode.as_bytes());
        write_u32_be(out, self.userflags);
        out.extend_from_slice(&self.description);
        out.extend_from_slice(&self.ownername);
        out.extend_from_slice(&self.comment);
    }
}

/// File timestamp block (`mcda`). The wire value counts seconds from the Mac
/// HFS epoch, 1904-01-01; the text form uses Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mcda {
    pub timestamp: u32,
}

impl Mcda {
    pub const WIRE_SIZE: u32 = 4;

    /// Offset between the 1904 Mac epoch and the 1970 Unix epoch, in seconds.
    pub const EPOCH_OFFSET: u32 = 2_082_844_800;

    fn parse(input: &[u8]) -> IResult<&[u8], Mcda> {
        let (input, timestamp) = be_u32(input)?;
        Ok((input, Mcda { timestamp }))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        write_u32_be(out, self.timestamp);
    }
}

/// Size constants block (`cnst`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cnst {
    pub nchannels: i32,
    pub nsweeps: i32,
    pub nsamples: i32,
    pub iqindicator: i32,
}

impl Cnst {
    pub const WIRE_SIZE: u32 = 16;

    fn parse(input: &[u8]) -> IResult<&[u8], Cnst> {
        let (input, nchannels) = be_i32(input)?;
        let (input, nsweeps) = be_i32(input)?;
        let (input, nsamples) = be_i32(input)?;
        let (input, iqindicator) = be_i32(input)?;
        Ok((
            input,
            Cnst {
                nchannels,
                nsweeps,
                nsamples,
                iqindicator,
            },
        ))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        write_i32_be(out, self.nchannels);
        write_i32_be(out, self.nsweeps);
        write_i32_be(out, self.nsamples);
        write_i32_be(out, self.iqindicator);
    }
}

/// Sweep parameters block (`swep`). Frequencies are in Hertz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swep {
    pub samplespersweep: i32,
    pub sweepstart: f64,
    pub sweepbandwidth: f64,
    pub sweeprate: f64,
    pub rangeoffset: i32,
}

impl Swep {
    pub const WIRE_SIZE: u32 = 32;

    fn parse(input: &[u8]) -> IResult<&[u8], Swep> {
        let (input, samplespersweep) = be_i32(input)?;
        let (input, sweepstart) = be_f64(input)?;
        let (input, sweepbandwidth) = be_f64(input)?;
        let (input, sweeprate) = be_f64(input)?;
        let (input, rangeoffset) = be_i32(input)?;
        Ok((
            input,
            Swep {
                samplespersweep,
                sweepstart,
                sweepbandwidth,
                sweeprate,
                rangeoffset,
            },
        ))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        write_i32_be(out, self.samplespersweep);
        write_f64_be(out, self.sweepstart);
        write_f64_be(out, self.sweepbandwidth);
        write_f64_be(out, self.sweeprate);
        write_i32_be(out, self.rangeoffset);
    }
}

/// Sample binary format block (`fbin`): the container format (normally
/// `cviq`) and the sample type (`flt4`, `fix2`, `fix3` or `fix4`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fbin {
    pub format: Fourcc,
    pub kind: Fourcc,
}

impl Fbin {
    pub const WIRE_SIZE: u32 = 8;

    fn parse(input: &[u8]) -> IResult<&[u8], Fbin> {
        let (input, format) = fourcc(input)?;
        let (input, kind) = fourcc(input)?;
        Ok((input, Fbin { format, kind }))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.format.as_bytes());
        out.extend_from_slice(self.kind.as_bytes());
    }
}

/// Per-channel scale factor block (`scal`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scal {
    /// Scaling value for I samples
    pub scalar_one: f64,
    /// Scaling value for Q samples
    pub scalar_two: f64,
}

impl Scal {
    pub const WIRE_SIZE: u32 = 16;

    fn parse(input: &[u8]) -> IResult<&[u8], Scal> {
        let (input, scalar_one) = be_f64(input)?;
        let (input, scalar_two) = be_f64(input)?;
        Ok((
            input,
            Scal {
                scalar_one,
                scalar_two,
            },
        ))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        write_f64_be(out, self.scalar_one);
        write_f64_be(out, self.scalar_two);
    }
}

/// One quantized I/Q sample: two signed 16-bit values on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqPair {
    pub i: i16,
    pub q: i16,
}

impl IqPair {
    pub const WIRE_SIZE: u32 = 4;
}

/// Sample data block (`alvl`): a variable-length run of I/Q pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Alvl {
    pub samples: Vec<IqPair>,
}

impl Alvl {
    fn parse(input: &[u8]) -> IResult<&[u8], Alvl> {
        let count = input.len() / IqPair::WIRE_SIZE as usize;
        let mut input = input;
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let (rest, i) = be_i16(input)?;
            let (rest, q) = be_i16(rest)?;
            samples.push(IqPair { i, q });
            input = rest;
        }
        Ok((input, Alvl { samples }))
    }

    fn write_be(&self, out: &mut Vec<u8>) {
        for pair in &self.samples {
            write_i16_be(out, pair.i);
            write_i16_be(out, pair.q);
        }
    }
}

/// Every payload a block record can carry. Container markers own no payload;
/// their content is the records that follow them.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Marker,
    Sign(Sign),
    Mcda(Mcda),
    Cnst(Cnst),
    Swep(Swep),
    Fbin(Fbin),
    Gtag { value: u32 },
    Atag { value: u32 },
    Indx { index: u32 },
    Scal(Scal),
    Alvl(Alvl),
}

impl BlockData {
    /// Parse a leaf payload from its (already size-clamped) wire bytes.
    ///
    /// This is the per-type endian fixup: every multi-byte field is read
    /// big-endian. A payload shorter than the type's fixed layout is fatal.
    pub fn parse(tag: Tag, payload: &[u8]) -> Result<BlockData> {
        let truncated = |expected: u32| BlockError::Truncated {
            tag,
            expected: expected as usize,
            actual: payload.len(),
        };
        match tag {
            Tag::Aqlv | Tag::Head | Tag::Body | Tag::End => Ok(BlockData::Marker),
            Tag::Sign => Sign::parse(payload)
                .map(|(_, v)| BlockData::Sign(v))
                .map_err(|_| truncated(Sign::WIRE_SIZE)),
            Tag::Mcda => Mcda::parse(payload)
                .map(|(_, v)| BlockData::Mcda(v))
                .map_err(|_| truncated(Mcda::WIRE_SIZE)),
            Tag::Cnst => Cnst::parse(payload)
                .map(|(_, v)| BlockData::Cnst(v))
                .map_err(|_| truncated(Cnst::WIRE_SIZE)),
            Tag::Swep => Swep::parse(payload)
                .map(|(_, v)| BlockData::Swep(v))
                .map_err(|_| truncated(Swep::WIRE_SIZE)),
            Tag::Fbin => Fbin::parse(payload)
                .map(|(_, v)| BlockData::Fbin(v))
                .map_err(|_| truncated(Fbin::WIRE_SIZE)),
            Tag::Gtag => be_u32_payload(payload)
                .map(|value| BlockData::Gtag { value })
                .ok_or_else(|| truncated(4)),
            Tag::Atag => be_u32_payload(payload)
                .map(|value| BlockData::Atag { value })
                .ok_or_else(|| truncated(4)),
            Tag::Indx => be_u32_payload(payload)
                .map(|index| BlockData::Indx { index })
                .ok_or_else(|| truncated(4)),
            Tag::Scal => Scal::parse(payload)
                .map(|(_, v)| BlockData::Scal(v))
                .map_err(|_| truncated(Scal::WIRE_SIZE)),
            Tag::Alvl => {
                if payload.len() < IqPair::WIRE_SIZE as usize {
                    return Err(truncated(IqPair::WIRE_SIZE));
                }
                if payload.len() % IqPair::WIRE_SIZE as usize != 0 {
                    tracing::warn!(
                        "alvl payload of {} bytes is not a whole number of samples",
                        payload.len()
                    );
                }
                Alvl::parse(payload)
                    .map(|(_, v)| BlockData::Alvl(v))
                    .map_err(|_| truncated(IqPair::WIRE_SIZE))
            }
        }
    }

    /// Serialize the payload to wire order. Markers contribute no bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_size() as usize);
        match self {
            BlockData::Marker => {}
            BlockData::Sign(v) => v.write_be(&mut out),
            BlockData::Mcda(v) => v.write_be(&mut out),
            BlockData::Cnst(v) => v.write_be(&mut out),
            BlockData::Swep(v) => v.write_be(&mut out),
            BlockData::Fbin(v) => v.write_be(&mut out),
            BlockData::Gtag { value } | BlockData::Atag { value } => write_u32_be(&mut out, *value),
            BlockData::Indx { index } => write_u32_be(&mut out, *index),
            BlockData::Scal(v) => v.write_be(&mut out),
            BlockData::Alvl(v) => v.write_be(&mut out),
        }
        out
    }

    /// Payload byte count on the wire, excluding the 8-byte block header.
    pub fn wire_size(&self) -> u32 {
        match self {
            BlockData::Marker => 0,
            BlockData::Sign(_) => Sign::WIRE_SIZE,
            BlockData::Mcda(_) => Mcda::WIRE_SIZE,
            BlockData::Cnst(_) => Cnst::WIRE_SIZE,
            BlockData::Swep(_) => Swep::WIRE_SIZE,
            BlockData::Fbin(_) => Fbin::WIRE_SIZE,
            BlockData::Gtag { .. } | BlockData::Atag { .. } | BlockData::Indx { .. } => 4,
            BlockData::Scal(_) => Scal::WIRE_SIZE,
            BlockData::Alvl(v) => v.samples.len() as u32 * IqPair::WIRE_SIZE,
        }
    }
}

fn fourcc(input: &[u8]) -> IResult<&[u8], Fourcc> {
    let (input, bytes) = take(4usize).parse(input)?;
    Ok((input, Fourcc([bytes[0], bytes[1], bytes[2], bytes[3]])))
}

fn byte_string<const N: usize>(input: &[u8]) -> IResult<&[u8], [u8; N]> {
    let (input, bytes) = take(N).parse(input)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((input, out))
}

fn be_u32_payload(payload: &[u8]) -> Option<u32> {
    crate::wire::read_u32_be(payload).ok()
}
