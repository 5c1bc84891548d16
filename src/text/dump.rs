// Text encoder: block tree -> key:value lines

use super::Result;
use crate::block::{Block, BlockData, Mcda, Tag};
use crate::samples::descale;
use crate::session::Session;
use std::io::Write;

/// Render the flat block sequence as editable text.
///
/// One walk, markers included as ordinary entries: each record emits its tag
/// line, its `key:value` lines, then a blank separator (none after `END `).
/// With `header_only`, emission stops just before the `BODY` marker.
pub fn dump_blocks(blocks: &[Block], out: &mut impl Write, header_only: bool) -> Result<()> {
    let mut session = Session::new();
    for block in blocks {
        if header_only && block.tag == Tag::Body {
            return Ok(());
        }
        dump_block(block, &mut session, out)?;
    }
    Ok(())
}

fn dump_block(block: &Block, session: &mut Session, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", block.tag)?;
    match &block.data {
        BlockData::Marker => {}
        BlockData::Sign(sign) => {
            writeln!(out, "version:{}", sign.version)?;
            writeln!(out, "filetype:{}", sign.filetype)?;
            writeln!(out, "sitecode:{}", sign.sitecode)?;
            writeln!(out, "userflags:{:x}", sign.userflags)?;
            writeln!(out, "description:{}", fixed_str(&sign.description))?;
            writeln!(out, "ownername:{}", fixed_str(&sign.ownername))?;
            writeln!(out, "comment:{}", fixed_str(&sign.comment))?;
        }
        BlockData::Mcda(mcda) => {
            // The wire timestamp counts from 1904; the text form from 1970.
            // A zero timestamp emits no line at all.
            if mcda.timestamp != 0 {
                let unix = mcda.timestamp.wrapping_sub(Mcda::EPOCH_OFFSET);
                writeln!(
                    out,
                    "timestamp:{} (NB: seconds since 1970) ({})",
                    unix,
                    ctime_utc(unix)
                )?;
            }
        }
        BlockData::Cnst(cnst) => {
            writeln!(out, "nchannels:{}", cnst.nchannels)?;
            writeln!(out, "nsweeps:{}", cnst.nsweeps)?;
            writeln!(out, "nsamples:{}", cnst.nsamples)?;
            writeln!(out, "iqindicator:{}", cnst.iqindicator)?;
        }
        BlockData::Swep(swep) => {
            writeln!(out, "samplespersweep:{}", swep.samplespersweep)?;
            writeln!(out, "sweepstart:{:.20}", swep.sweepstart)?;
            writeln!(out, "sweepbandwidth:{:.20}", swep.sweepbandwidth)?;
            writeln!(out, "sweeprate:{:.20}", swep.sweeprate)?;
            writeln!(out, "rangeoffset:{}", swep.rangeoffset)?;
        }
        BlockData::Fbin(fbin) => {
            session.sample_kind = Some(fbin.kind);
            writeln!(out, "format:{}", fbin.format)?;
            writeln!(out, "type:{}", fbin.kind)?;
        }
        BlockData::Gtag { value } => writeln!(out, "gtag:{}", value)?,
        BlockData::Atag { value } => writeln!(out, "atag:{}", value)?,
        BlockData::Indx { index } => {
            session.index = *index;
            writeln!(out, "index:{}", index)?;
        }
        BlockData::Scal(scal) => {
            session.scalar_one = scal.scalar_one;
            session.scalar_two = scal.scalar_two;
            writeln!(out, "scalar_one:{:.20}", scal.scalar_one)?;
            writeln!(out, "scalar_two:{:.20}", scal.scalar_two)?;
        }
        BlockData::Alvl(alvl) => {
            let fullscale = session.sample_format()?.fullscale();
            for pair in &alvl.samples {
                writeln!(out, "i:{:.20}", descale(pair.i, fullscale, session.scalar_one))?;
                writeln!(out, "q:{:.20}", descale(pair.q, fullscale, session.scalar_two))?;
            }
        }
    }
    if block.tag != Tag::End {
        writeln!(out)?;
    }
    Ok(())
}

/// Render Unix seconds as a ctime-style UTC date, e.g.
/// `Sat Feb 10 22:20:00 2018`. The generate direction never reads this;
/// it parses only the leading number.
fn ctime_utc(secs: u32) -> String {
    const WDAY: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    const MON: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let secs = i64::from(secs);
    let days = secs.div_euclid(86_400);
    let tod = secs.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    // 1970-01-01 was a Thursday
    let wday = (days + 4).rem_euclid(7) as usize;
    format!(
        "{} {} {:2} {:02}:{:02}:{:02} {}",
        WDAY[wday],
        MON[(month - 1) as usize],
        day,
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60,
        year
    )
}

/// Days since the Unix epoch to (year, month, day) in the proleptic
/// Gregorian calendar.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Fixed-length byte string rendered up to its first NUL.
fn fixed_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
