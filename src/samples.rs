// Fixed-point sample quantization codec
//
// Stored samples are scaled integers; the physical value is
//   physical = stored / fullscale * channel_scale
// and quantization is the inverse with round-half-away-from-zero.

use crate::wire::Fourcc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Unknown sample type '{tag}' at index {index}")]
    UnknownFormat { tag: Fourcc, index: u32 },

    #[error("No sample type seen before sample data at index {index}")]
    FormatUnset { index: u32 },
}

/// How one stored sample value maps to a physical double.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Single-precision float, no quantization
    Flt4,
    /// 2-byte fixed point
    Fix2,
    /// 3-byte fixed point
    Fix3,
    /// 4-byte fixed point
    Fix4,
}

impl SampleFormat {
    pub fn from_fourcc(fourcc: Fourcc) -> Option<SampleFormat> {
        match fourcc.as_bytes() {
            b"flt4" => Some(SampleFormat::Flt4),
            b"fix2" => Some(SampleFormat::Fix2),
            b"fix3" => Some(SampleFormat::Fix3),
            b"fix4" => Some(SampleFormat::Fix4),
            _ => None,
        }
    }

    /// The quantization denominator: the largest magnitude the format can
    /// store, or 1 for the float format.
    pub fn fullscale(self) -> f64 {
        match self {
            SampleFormat::Flt4 => 1.0,
            SampleFormat::Fix2 => 0x7FFF as f64,
            SampleFormat::Fix3 => 0x7F_FFFF as f64,
            SampleFormat::Fix4 => 0x7FFF_FFFF as f64,
        }
    }
}

/// Convert a stored sample to its physical value.
pub fn descale(stored: i16, fullscale: f64, channel_scale: f64) -> f64 {
    stored as f64 / fullscale * channel_scale
}

/// Convert a physical value back to a stored sample.
///
/// Rounds half away from zero (`f64::round`); any other tie-breaking rule
/// would break quantize/descale idempotence for exact-half values.
pub fn quantize(physical: f64, fullscale: f64, channel_scale: f64) -> i16 {
    (physical / channel_scale * fullscale).round() as i16
}
