use chrono::FixedOffset;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::parser::offset::{fixed_offset, DateFields};
use crate::parser::traits::*;

static LIBVIRT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(\d{4})-(\d{2})-(\d{2}) ",        // Date
        r"(\d{2}):(\d{2}):(\d{2})\.(\d{3})", // Time
        r"([+-])(\d{2})(\d{2}):\s*",         // Timezone
    ))
    .expect("libvirt header pattern is valid")
});

static QEMU: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(\d{4})-(\d{2})-(\d{2})T",      // Date
        r"(\d{2}):(\d{2}):(\d{2})\.(\d+)Z\s*", // Time, always UTC
    ))
    .expect("qemu header pattern is valid")
});

/// libvirtd.log and libvirt domain logs.
///
/// Domain logs interleave libvirt lines (`2017-09-18 18:08:49.163+0000:`)
/// with qemu lines (`2017-09-18T18:08:49.216429Z qemu-kvm:`), so both
/// shapes are accepted.
pub struct LibvirtParser;

fn date_fields<'a>(caps: &Captures<'a>) -> Option<DateFields<'a>> {
    Some(DateFields {
        year: caps.get(1)?.as_str(),
        month: caps.get(2)?.as_str(),
        day: caps.get(3)?.as_str(),
        hour: caps.get(4)?.as_str(),
        minute: caps.get(5)?.as_str(),
        second: caps.get(6)?.as_str(),
        fraction: caps.get(7)?.as_str(),
    })
}

impl LibvirtParser {
    fn parse_libvirt<'a>(line: &'a str, caps: &Captures<'a>) -> Option<ParsedLine<'a>> {
        let tz = fixed_offset(caps.get(8)?.as_str(), caps.get(9)?.as_str(), caps.get(10)?.as_str())?;
        let timestamp = date_fields(caps)?.in_zone(tz)?;
        let header = caps.get(0)?;
        // Drop the trailing whitespace and the colon that ends the header
        let raw = header.as_str().trim_end();
        let raw = raw.strip_suffix(':').unwrap_or(raw);

        Some(ParsedLine {
            timestamp,
            raw_timestamp: raw,
            remainder: &line[header.end()..],
        })
    }

    fn parse_qemu<'a>(line: &'a str, caps: &Captures<'a>) -> Option<ParsedLine<'a>> {
        let utc = FixedOffset::east_opt(0)?;
        let timestamp = date_fields(caps)?.in_zone(utc)?;
        let header = caps.get(0)?;

        Some(ParsedLine {
            timestamp,
            raw_timestamp: header.as_str().trim_end(),
            remainder: &line[header.end()..],
        })
    }
}

impl TimestampParser for LibvirtParser {
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a> {
        if let Some(caps) = LIBVIRT.captures(line) {
            return Self::parse_libvirt(line, &caps).into();
        }
        if let Some(caps) = QEMU.captures(line) {
            return Self::parse_qemu(line, &caps).into();
        }
        ParseOutcome::Unrecognized
    }

    fn format(&self) -> LogFormat {
        LogFormat::Libvirt
    }
}
