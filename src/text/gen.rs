// Text decoder: key:value lines -> block tree

use super::{Result, TextError};
use crate::block::{Alvl, Block, BlockData, Cnst, Fbin, IqPair, Mcda, Scal, Sign, Swep, Tag};
use crate::samples::quantize;
use crate::session::Session;
use crate::wire::Fourcc;
use std::io::BufRead;

/// Parse a text rendition back into a flat block sequence.
///
/// A line containing `:` can never start a block; only a line without one is
/// read as a 4-character tag. Each block's section runs to the next blank
/// line or the next tag line, whichever comes first, and its parameters are
/// looked up by key anywhere inside the section, so parameter order within a
/// block is free. Marker sizes are left at zero for the backpatcher.
pub fn parse_text(reader: impl BufRead) -> Result<Vec<Block>> {
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    let mut session = Session::new();
    let mut blocks = Vec::new();
    let mut pos = 0;
    while pos < lines.len() {
        let line = lines[pos].trim_end();
        if line.is_empty() || line.contains(':') {
            pos += 1;
            continue;
        }
        let fourcc = Fourcc::from_line(line);
        let tag = Tag::from_fourcc(fourcc).ok_or(TextError::UnknownTag {
            tag: fourcc,
            line: pos + 1,
        })?;
        let tag_line = pos + 1;
        pos += 1;
        // A colon-less line is always the next block's tag, so a section ends
        // there too: a deleted blank separator must not swallow a block.
        let section_end = lines[pos..]
            .iter()
            .position(|l| {
                let line = l.trim_end();
                line.is_empty() || !line.contains(':')
            })
            .map(|i| pos + i)
            .unwrap_or(lines.len());
        let section = Section {
            lines: &lines[pos..section_end],
            first_line: pos + 1,
            tag,
            tag_line,
        };
        blocks.push(make_block(&section, &mut session)?);
        pos = section_end;
    }
    Ok(blocks)
}

/// One block's worth of text: the lines between its tag line and the next
/// blank line, with 1-based line numbers for diagnostics.
struct Section<'a> {
    lines: &'a [String],
    first_line: usize,
    tag: Tag,
    tag_line: usize,
}

impl Section<'_> {
    /// Find `key:` anywhere in the section; order independent per field.
    fn param(&self, key: &str) -> Result<(&str, usize)> {
        for (offset, line) in self.lines.iter().enumerate() {
            if let Some(value) = line.trim_end().strip_prefix(key).and_then(|r| r.strip_prefix(':'))
            {
                return Ok((value, self.first_line + offset));
            }
        }
        Err(TextError::MissingParameter {
            tag: self.tag,
            key: key.to_string(),
            line: self.tag_line,
        })
    }

    fn u32(&self, key: &str) -> Result<u32> {
        let (value, line) = self.param(key)?;
        parse_token(value, key, line)
    }

    fn i32(&self, key: &str) -> Result<i32> {
        let (value, line) = self.param(key)?;
        parse_token(value, key, line)
    }

    fn f64(&self, key: &str) -> Result<f64> {
        let (value, line) = self.param(key)?;
        parse_token(value, key, line)
    }

    fn hex_u32(&self, key: &str) -> Result<u32> {
        let (value, line) = self.param(key)?;
        let token = first_token(value, key, line)?;
        u32::from_str_radix(token, 16).map_err(|_| TextError::BadValue {
            key: key.to_string(),
            value: token.to_string(),
            line,
        })
    }

    fn fourcc(&self, key: &str) -> Result<Fourcc> {
        let (value, _) = self.param(key)?;
        Ok(Fourcc::from_line(value.trim_start()))
    }

    fn fixed_str<const N: usize>(&self, key: &str) -> Result<[u8; N]> {
        let (value, _) = self.param(key)?;
        let mut out = [0u8; N];
        for (dst, src) in out.iter_mut().zip(value.bytes()) {
            *dst = src;
        }
        Ok(out)
    }
}

fn first_token<'a>(value: &'a str, key: &str, line: usize) -> Result<&'a str> {
    value
        .split_whitespace()
        .next()
        .ok_or_else(|| TextError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
            line,
        })
}

/// Parse the first whitespace-delimited token; trailing annotation text after
/// the number is tolerated, like the `(NB: ...)` note on timestamps.
fn parse_token<T: std::str::FromStr>(value: &str, key: &str, line: usize) -> Result<T> {
    let token = first_token(value, key, line)?;
    token.parse().map_err(|_| TextError::BadValue {
        key: key.to_string(),
        value: token.to_string(),
        line,
    })
}

fn make_block(section: &Section<'_>, session: &mut Session) -> Result<Block> {
    let tag = section.tag;
    if tag.is_container() {
        return Ok(Block::marker(tag));
    }
    let data = match tag {
        Tag::Sign => BlockData::Sign(Sign {
            version: section.fourcc("version")?,
            filetype: section.fourcc("filetype")?,
            sitecode: section.fourcc("sitecode")?,
            userflags: section.hex_u32("userflags")?,
            description: section.fixed_str("description")?,
            ownername: section.fixed_str("ownername")?,
            comment: section.fixed_str("comment")?,
        }),
        Tag::Mcda => BlockData::Mcda(Mcda {
            // text form is Unix seconds; the wire counts from 1904
            timestamp: section.u32("timestamp")?.wrapping_add(Mcda::EPOCH_OFFSET),
        }),
        Tag::Cnst => BlockData::Cnst(Cnst {
            nchannels: section.i32("nchannels")?,
            nsweeps: section.i32("nsweeps")?,
            nsamples: section.i32("nsamples")?,
            iqindicator: section.i32("iqindicator")?,
        }),
        Tag::Swep => BlockData::Swep(Swep {
            samplespersweep: section.i32("samplespersweep")?,
            sweepstart: section.f64("sweepstart")?,
            sweepbandwidth: section.f64("sweepbandwidth")?,
            sweeprate: section.f64("sweeprate")?,
            rangeoffset: section.i32("rangeoffset")?,
        }),
        Tag::Fbin => {
            let fbin = Fbin {
                format: section.fourcc("format")?,
                kind: section.fourcc("type")?,
            };
            session.sample_kind = Some(fbin.kind);
            BlockData::Fbin(fbin)
        }
        Tag::Gtag => BlockData::Gtag {
            value: section.u32("gtag")?,
        },
        Tag::Atag => BlockData::Atag {
            value: section.u32("atag")?,
        },
        Tag::Indx => {
            let index = section.u32("index")?;
            session.index = index;
            BlockData::Indx { index }
        }
        Tag::Scal => {
            let scal = Scal {
                scalar_one: section.f64("scalar_one")?,
                scalar_two: section.f64("scalar_two")?,
            };
            session.scalar_one = scal.scalar_one;
            session.scalar_two = scal.scalar_two;
            BlockData::Scal(scal)
        }
        Tag::Alvl => BlockData::Alvl(make_alvl(section, session)?),
        Tag::Aqlv | Tag::Head | Tag::Body | Tag::End => unreachable!("containers handled above"),
    };
    Ok(Block::leaf(tag, data))
}

/// Sample blocks are the variable-length exception: the line count sizes the
/// sample buffer, then each `i:`/`q:` pair is quantized with the session's
/// current format and scale factors.
fn make_alvl(section: &Section<'_>, session: &Session) -> Result<Alvl> {
    let count = section.lines.len();
    if count == 0 {
        return Err(TextError::EmptySampleBlock {
            tag: section.tag,
            line: section.tag_line,
        });
    }
    if count % 2 != 0 {
        return Err(TextError::OddSampleCount {
            tag: section.tag,
            count,
            line: section.tag_line,
        });
    }
    let fullscale = session.sample_format()?.fullscale();
    let mut samples = Vec::with_capacity(count / 2);
    for (n, pair) in section.lines.chunks(2).enumerate() {
        let i_line = section.first_line + 2 * n;
        let i: f64 = parse_token(sample_value(&pair[0], "i", i_line)?, "i", i_line)?;
        let q: f64 = parse_token(sample_value(&pair[1], "q", i_line + 1)?, "q", i_line + 1)?;
        samples.push(IqPair {
            i: quantize(i, fullscale, session.scalar_one),
            q: quantize(q, fullscale, session.scalar_two),
        });
    }
    Ok(Alvl { samples })
}

fn sample_value<'a>(line: &'a str, key: &str, line_no: usize) -> Result<&'a str> {
    line.trim_end()
        .strip_prefix(key)
        .and_then(|r| r.strip_prefix(':'))
        .ok_or_else(|| TextError::BadValue {
            key: key.to_string(),
            value: line.trim_end().to_string(),
            line: line_no,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Vec<Block>> {
        parse_text(Cursor::new(text))
    }

    #[test]
    fn test_markers_and_leaf() {
        let blocks = parse("AQLV\n\nHEAD\n\nindx\nindex:9\n\nBODY\n\nEND \n").unwrap();
        let tags: Vec<Tag> = blocks.iter().map(|b| b.tag).collect();
        assert_eq!(
            tags,
            vec![Tag::Aqlv, Tag::Head, Tag::Indx, Tag::Body, Tag::End]
        );
        assert_eq!(blocks[2].data, BlockData::Indx { index: 9 });
        assert_eq!(blocks[2].size, 4);
    }

    #[test]
    fn test_end_without_trailing_space_still_parses() {
        let blocks = parse("END\n").unwrap();
        assert_eq!(blocks[0].tag, Tag::End);
    }

    #[test]
    fn test_parameter_order_is_free_within_a_block() {
        let text = "cnst\niqindicator:2\nnsamples:2048\nnchannels:3\nnsweeps:32\n";
        let blocks = parse(text).unwrap();
        assert_eq!(
            blocks[0].data,
            BlockData::Cnst(Cnst {
                nchannels: 3,
                nsweeps: 32,
                nsamples: 2048,
                iqindicator: 2,
            })
        );
    }

    #[test]
    fn test_missing_parameter_is_fatal() {
        let err = parse("cnst\nnchannels:3\n").unwrap_err();
        match err {
            TextError::MissingParameter { tag, key, line } => {
                assert_eq!(tag, Tag::Cnst);
                assert_eq!(key, "nsweeps");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_reports_line() {
        let err = parse("AQLV\n\nNOPE\n").unwrap_err();
        assert!(matches!(err, TextError::UnknownTag { line: 3, .. }));
    }

    #[test]
    fn test_timestamp_note_is_tolerated() {
        let text = "mcda\ntimestamp:1518301200 (NB: seconds since 1970)\n";
        let blocks = parse(text).unwrap();
        assert_eq!(
            blocks[0].data,
            BlockData::Mcda(Mcda {
                timestamp: 1_518_301_200 + Mcda::EPOCH_OFFSET
            })
        );
    }

    #[test]
    fn test_userflags_parse_as_hex() {
        let text = "sign\nversion:V001\nfiletype:AQTS\nsitecode:BML1\nuserflags:ff\n\
                    description:test file\nownername:nobody\ncomment:\n";
        let blocks = parse(text).unwrap();
        let BlockData::Sign(sign) = &blocks[0].data else {
            panic!("wrong variant");
        };
        assert_eq!(sign.userflags, 0xFF);
        assert_eq!(&sign.description[..9], b"test file");
        assert_eq!(sign.description[9], 0);
    }

    #[test]
    fn test_alvl_quantizes_with_session_state() {
        let text = "fbin\nformat:cviq\ntype:fix2\n\n\
                    scal\nscalar_one:3.0\nscalar_two:5.0\n\n\
                    alvl\ni:3.0\nq:-5.0\n";
        let blocks = parse(text).unwrap();
        let BlockData::Alvl(alvl) = &blocks[2].data else {
            panic!("wrong variant");
        };
        assert_eq!(alvl.samples, vec![IqPair { i: 32767, q: -32767 }]);
        assert_eq!(blocks[2].size, 4);
    }

    #[test]
    fn test_alvl_odd_line_count_is_fatal() {
        let text = "fbin\nformat:cviq\ntype:fix2\n\nalvl\ni:1.0\nq:2.0\ni:3.0\n";
        assert!(matches!(
            parse(text).unwrap_err(),
            TextError::OddSampleCount { count: 3, .. }
        ));
    }

    #[test]
    fn test_alvl_before_fbin_is_fatal() {
        assert!(parse("alvl\ni:1.0\nq:2.0\n").is_err());
    }

    #[test]
    fn test_alvl_unknown_type_reports_offender() {
        let text = "fbin\nformat:cviq\ntype:fix9\n\nalvl\ni:1.0\nq:2.0\n";
        let err = parse(text).unwrap_err();
        assert!(err.to_string().contains("fix9"));
    }

    #[test]
    fn test_missing_blank_separator_does_not_drop_next_block() {
        // no blank line between the two blocks
        let blocks = parse("indx\nindex:4\ngtag\ngtag:5\n").unwrap();
        let tags: Vec<Tag> = blocks.iter().map(|b| b.tag).collect();
        assert_eq!(tags, vec![Tag::Indx, Tag::Gtag]);
        assert_eq!(blocks[0].data, BlockData::Indx { index: 4 });
        assert_eq!(blocks[1].data, BlockData::Gtag { value: 5 });
    }

    #[test]
    fn test_markers_without_separators_still_parse() {
        let blocks = parse("AQLV\nHEAD\nBODY\nEND \n").unwrap();
        let tags: Vec<Tag> = blocks.iter().map(|b| b.tag).collect();
        assert_eq!(tags, vec![Tag::Aqlv, Tag::Head, Tag::Body, Tag::End]);
    }

    #[test]
    fn test_stray_parameter_lines_are_skipped() {
        // a key:value line can never start a block
        let blocks = parse("orphan:1\n\nindx\nindex:4\n").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag, Tag::Indx);
    }
}
