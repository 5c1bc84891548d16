// Big-endian wire primitives for the TS container format

pub mod elements;
pub mod fourcc;

pub use elements::{
    read_u32_be, write_f64_be, write_i16_be, write_i32_be, write_u32_be, WireError,
};
pub use fourcc::Fourcc;
