// SEASONDE-TS: converter between binary CODAR SeaSonde Time Series (TS)
// files and an editable text representation, in both directions.

pub mod block;
pub mod codec;
pub mod samples;
pub mod session;
pub mod text;
pub mod wire;

// Re-export commonly used types
pub use block::{Block, BlockData, Tag};
pub use codec::{fixup_sizes, parse_file, write_blocks, CodecError};
pub use samples::{descale, quantize, SampleFormat};
pub use session::Session;
pub use text::{dump_blocks, parse_text, TextError};
pub use wire::Fourcc;

/// seasonde-ts version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
