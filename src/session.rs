// Cross-block state threaded through one dump or generate pass

use crate::samples::{SampleError, SampleFormat};
use crate::wire::Fourcc;

/// Mutable context owned by a single decode-or-encode pass.
///
/// `fbin` and `scal` blocks populate it; a later `alvl` block depends on it.
/// That ordering comes from the source file, not from this type.
#[derive(Debug, Default, Clone)]
pub struct Session {
    /// Sample type fourcc from the most recent `fbin` block. Kept as a raw
    /// fourcc so an unknown type only fails once sample data is processed.
    pub sample_kind: Option<Fourcc>,
    /// I-channel scale factor from the most recent `scal` block
    pub scalar_one: f64,
    /// Q-channel scale factor from the most recent `scal` block
    pub scalar_two: f64,
    /// Most recent sweep index, used only for diagnostics
    pub index: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the current sample format, failing if no `fbin` block has been
    /// seen or its type fourcc is not recognized.
    pub fn sample_format(&self) -> Result<SampleFormat, SampleError> {
        let tag = self
            .sample_kind
            .ok_or(SampleError::FormatUnset { index: self.index })?;
        SampleFormat::from_fourcc(tag).ok_or(SampleError::UnknownFormat {
            tag,
            index: self.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_unset_is_an_error() {
        let session = Session::new();
        assert!(matches!(
            session.sample_format(),
            Err(SampleError::FormatUnset { .. })
        ));
    }

    #[test]
    fn test_unknown_format_reports_tag_and_index() {
        let session = Session {
            sample_kind: Some(Fourcc::new(b"fix9")),
            index: 12,
            ..Session::default()
        };
        match session.sample_format() {
            Err(SampleError::UnknownFormat { tag, index }) => {
                assert_eq!(tag, Fourcc::new(b"fix9"));
                assert_eq!(index, 12);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_known_format_resolves() {
        let session = Session {
            sample_kind: Some(Fourcc::new(b"fix2")),
            ..Session::default()
        };
        assert_eq!(session.sample_format().unwrap(), SampleFormat::Fix2);
    }
}
