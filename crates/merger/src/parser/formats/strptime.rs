use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone};

use crate::parser::traits::*;
use crate::parser::{ParseError, ParserContext};

/// Fixed-width strptime-style recognizer.
///
/// The date occupies a fixed number of space-separated words at the
/// start of the line; everything after the separator that follows them
/// is the payload.
pub struct StrptimeParser {
    format: LogFormat,
    pattern: &'static str,
    words: usize,
    requires_fraction: bool,
    /// Year supplied from outside for formats that do not carry one
    year: Option<i32>,
    tz: FixedOffset,
}

impl StrptimeParser {
    /// `2016-02-01 10:22:59.239`
    pub fn openstack(ctx: &ParserContext) -> Self {
        Self {
            format: LogFormat::OpenStack,
            pattern: "%Y-%m-%d %H:%M:%S%.f",
            words: 2,
            requires_fraction: true,
            year: None,
            tz: ctx.default_tz,
        }
    }

    /// `Oct 15 14:11:19`
    ///
    /// The year is taken from the file's last-modified time, so a log
    /// that crosses a year boundary is stamped with the later year
    /// throughout.
    pub fn messages(ctx: &ParserContext) -> Result<Self, ParseError> {
        Ok(Self {
            format: LogFormat::Messages,
            pattern: "%Y %b %d %H:%M:%S",
            words: 3,
            requires_fraction: false,
            year: Some(modified_year(ctx)?),
            tz: ctx.default_tz,
        })
    }

    /// `Mar 13 15:19:08.525234`
    pub fn messages_micros(ctx: &ParserContext) -> Result<Self, ParseError> {
        Ok(Self {
            format: LogFormat::MessagesMicros,
            pattern: "%Y %b %d %H:%M:%S%.f",
            words: 3,
            requires_fraction: true,
            year: Some(modified_year(ctx)?),
            tz: ctx.default_tz,
        })
    }

    /// Split off the first `words` space-separated words.
    fn split_date<'a>(&self, line: &'a str) -> (&'a str, &'a str) {
        match line.match_indices(' ').nth(self.words - 1) {
            Some((idx, _)) => (&line[..idx], &line[idx + 1..]),
            None => {
                let date = line.trim_end_matches(['\r', '\n']);
                (date, &line[date.len()..])
            }
        }
    }

    fn timestamp(&self, date: &str) -> Option<DateTime<FixedOffset>> {
        if self.requires_fraction && !date.contains('.') {
            return None;
        }
        let naive = match self.year {
            Some(year) => NaiveDateTime::parse_from_str(&format!("{year} {date}"), self.pattern),
            None => NaiveDateTime::parse_from_str(date, self.pattern),
        }
        .ok()?;
        self.tz.from_local_datetime(&naive).single()
    }
}

fn modified_year(ctx: &ParserContext) -> Result<i32, ParseError> {
    Ok(ctx.modified()?.with_timezone(&ctx.default_tz).year())
}

impl TimestampParser for StrptimeParser {
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a> {
        let (date, remainder) = self.split_date(line);
        self.timestamp(date)
            .map(|timestamp| ParsedLine {
                timestamp,
                raw_timestamp: date,
                remainder,
            })
            .into()
    }

    fn format(&self) -> LogFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn context_modified_at(secs: u64) -> (tempfile::TempDir, ParserContext) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages");
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
        (dir, ParserContext::new(path, utc()))
    }

    #[test]
    fn test_openstack_line() {
        let parser = StrptimeParser::openstack(&ParserContext::new("unused", utc()));
        let parsed = parser
            .parse("2016-02-01 10:22:59.239 12345 INFO nova.api [-] hello\n")
            .recognized()
            .unwrap();

        assert_eq!(parsed.raw_timestamp, "2016-02-01 10:22:59.239");
        assert_eq!(parsed.remainder, "12345 INFO nova.api [-] hello\n");
        assert_eq!(parsed.timestamp.to_rfc3339(), "2016-02-01T10:22:59.239+00:00");
    }

    #[test]
    fn test_openstack_requires_fraction() {
        let parser = StrptimeParser::openstack(&ParserContext::new("unused", utc()));
        assert!(!parser.parse("2016-02-01 10:22:59 INFO x").is_recognized());
    }

    #[test]
    fn test_openstack_rejects_other_lines() {
        let parser = StrptimeParser::openstack(&ParserContext::new("unused", utc()));
        assert!(!parser.parse("    Traceback (most recent call last):").is_recognized());
        assert!(!parser.parse("2017-09-18 18:08:49.163+0000: 1234: info").is_recognized());
        assert!(!parser.parse("").is_recognized());
    }

    #[test]
    fn test_openstack_timestamp_only_line() {
        let parser = StrptimeParser::openstack(&ParserContext::new("unused", utc()));
        let parsed = parser.parse("2016-02-01 10:22:59.239\n").recognized().unwrap();
        assert_eq!(parsed.raw_timestamp, "2016-02-01 10:22:59.239");
        assert_eq!(parsed.remainder, "\n");
    }

    #[test]
    fn test_openstack_applies_default_tz() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let parser = StrptimeParser::openstack(&ParserContext::new("unused", tz));
        let parsed = parser.parse("2016-02-01 10:22:59.239 x").recognized().unwrap();
        assert_eq!(parsed.timestamp.to_rfc3339(), "2016-02-01T10:22:59.239+02:00");
    }

    #[test]
    fn test_messages_year_from_mtime() {
        // 2019-06-01T00:00:00Z
        let (_dir, ctx) = context_modified_at(1_559_347_200);
        let parser = StrptimeParser::messages(&ctx).unwrap();
        let parsed = parser
            .parse("Oct 15 14:11:19 host systemd[1]: Started.\n")
            .recognized()
            .unwrap();

        assert_eq!(parsed.raw_timestamp, "Oct 15 14:11:19");
        assert_eq!(parsed.remainder, "host systemd[1]: Started.\n");
        assert_eq!(parsed.timestamp.to_rfc3339(), "2019-10-15T14:11:19+00:00");
    }

    #[test]
    fn test_messages_rejects_microseconds() {
        let (_dir, ctx) = context_modified_at(1_559_347_200);
        let plain = StrptimeParser::messages(&ctx).unwrap();
        let micros = StrptimeParser::messages_micros(&ctx).unwrap();
        let line = "Mar 13 15:19:08.525234 host kernel: x";

        assert!(!plain.parse(line).is_recognized());
        let parsed = micros.parse(line).recognized().unwrap();
        assert_eq!(parsed.raw_timestamp, "Mar 13 15:19:08.525234");
        assert_eq!(parsed.timestamp.to_rfc3339(), "2019-03-13T15:19:08.525234+00:00");
    }

    #[test]
    fn test_messages_missing_file_fails_construction() {
        let ctx = ParserContext::new("/nonexistent/messages", utc());
        assert!(matches!(StrptimeParser::messages(&ctx), Err(ParseError::Io { .. })));
    }
}
