// The closed set of known block types

use crate::wire::Fourcc;
use std::fmt;

/// Every block type the TS container format defines.
///
/// This is the type registry: `from_fourcc` fails closed, so any tag not in
/// this set is a fatal condition wherever it is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Outer wrapper container
    Aqlv,
    /// Header section container
    Head,
    /// Data section container
    Body,
    /// Terminal marker (fourcc has a trailing space)
    End,
    /// File signature: version, type, site code, description strings
    Sign,
    /// File creation timestamp (Mac HFS epoch on the wire)
    Mcda,
    /// Channel/sweep/sample counts
    Cnst,
    /// Sweep parameters (start frequency, bandwidth, rate)
    Swep,
    /// Sample binary format and type
    Fbin,
    Gtag,
    Atag,
    /// Sweep index
    Indx,
    /// Per-channel I/Q scale factors
    Scal,
    /// Quantized I/Q sample data
    Alvl,
}

impl Tag {
    /// All known tags, in canonical top-level order for the leaves.
    pub const ALL: [Tag; 14] = [
        Tag::Aqlv,
        Tag::Head,
        Tag::Sign,
        Tag::Mcda,
        Tag::Cnst,
        Tag::Swep,
        Tag::Fbin,
        Tag::Gtag,
        Tag::Atag,
        Tag::Indx,
        Tag::Scal,
        Tag::Body,
        Tag::Alvl,
        Tag::End,
    ];

    /// Look up a wire fourcc. `None` means the tag is not in the registry.
    pub fn from_fourcc(fourcc: Fourcc) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|t| t.fourcc() == fourcc)
    }

    pub const fn fourcc(self) -> Fourcc {
        match self {
            Tag::Aqlv => Fourcc::new(b"AQLV"),
            Tag::Head => Fourcc::new(b"HEAD"),
            Tag::Body => Fourcc::new(b"BODY"),
            Tag::End => Fourcc::new(b"END "),
            Tag::Sign => Fourcc::new(b"sign"),
            Tag::Mcda => Fourcc::new(b"mcda"),
            Tag::Cnst => Fourcc::new(b"cnst"),
            Tag::Swep => Fourcc::new(b"swep"),
            Tag::Fbin => Fourcc::new(b"fbin"),
            Tag::Gtag => Fourcc::new(b"gtag"),
            Tag::Atag => Fourcc::new(b"atag"),
            Tag::Indx => Fourcc::new(b"indx"),
            Tag::Scal => Fourcc::new(b"scal"),
            Tag::Alvl => Fourcc::new(b"alvl"),
        }
    }

    /// True for the four structural markers whose size covers the records
    /// they enclose rather than a payload of their own.
    pub const fn is_container(self) -> bool {
        matches!(self, Tag::Aqlv | Tag::Head | Tag::Body | Tag::End)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fourcc().fmt(f)
    }
}
