use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::offset::{fixed_offset, DateFields};
use crate::parser::traits::*;

/// RFC 5424 header: `<PRI>VERSION TIMESTAMP`
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^<\d+>\d+\s",
        r"(",
        r"(\d{4})-(\d{2})-(\d{2})T",      // Date
        r"(\d{2}):(\d{2}):(\d{2})\.(\d+)", // Time
        r"([+-])(\d{2}):(\d{2})",          // Timezone
        r")\s*",
    ))
    .expect("syslog header pattern is valid")
});

/// Raw syslog packets as captured off the wire, e.g.
/// `<183>1 2017-04-03T21:48:21.781459-03:30 host app - - msg`.
///
/// Only the timestamp group is kept as the raw text; the priority and
/// version prefix is dropped from the output.
pub struct RawSyslogParser;

impl RawSyslogParser {
    fn parse_header<'a>(line: &'a str) -> Option<ParsedLine<'a>> {
        let caps = HEADER.captures(line)?;
        let fields = DateFields {
            year: caps.get(2)?.as_str(),
            month: caps.get(3)?.as_str(),
            day: caps.get(4)?.as_str(),
            hour: caps.get(5)?.as_str(),
            minute: caps.get(6)?.as_str(),
            second: caps.get(7)?.as_str(),
            fraction: caps.get(8)?.as_str(),
        };
        let tz = fixed_offset(caps.get(9)?.as_str(), caps.get(10)?.as_str(), caps.get(11)?.as_str())?;

        Some(ParsedLine {
            timestamp: fields.in_zone(tz)?,
            raw_timestamp: caps.get(1)?.as_str(),
            remainder: &line[caps.get(0)?.end()..],
        })
    }
}

impl TimestampParser for RawSyslogParser {
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a> {
        Self::parse_header(line).into()
    }

    fn format(&self) -> LogFormat {
        LogFormat::RawSyslog
    }
}
