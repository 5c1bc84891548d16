// Fixed-width big-endian field read/write helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;

/// Read a u32 in big-endian format
pub fn read_u32_be(data: &[u8]) -> Result<u32> {
    if data.len() < 4 {
        return Err(WireError::InsufficientData {
            expected: 4,
            actual: data.len(),
        });
    }
    Ok(u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
}

/// Append a u32 in big-endian format
pub fn write_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append an i32 in big-endian format
pub fn write_i32_be(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append an i16 in big-endian format
pub fn write_i16_be(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append an f64 in big-endian (IEEE 754) format
pub fn write_f64_be(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_be_bytes());
}
