use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::traits::*;

/// Leading date-like text worth handing to the format list below.
static CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\[?(",
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?", // ISO 8601
        r"|\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}(?:\.\d+)?",                              // Asian
        r"|\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}(?:\.\d+)?",                              // US
        r"|\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}(?: [+-]\d{4})?",                   // Apache
        r")\]?",
    ))
    .expect("fuzzy candidate pattern is valid")
});

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%d/%b/%Y:%H:%M:%S %z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%d/%b/%Y:%H:%M:%S",
];

/// General fallback for formats without a dedicated fast recognizer.
///
/// Every candidate goes through a list of chrono formats until one
/// sticks, which is far slower than the other recognizers. It is tried
/// last during detection and only wins when nothing specific matched.
pub struct FuzzyParser {
    tz: FixedOffset,
}

impl FuzzyParser {
    pub fn new(default_tz: FixedOffset) -> Self {
        Self { tz: default_tz }
    }

    fn timestamp(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let text: Cow<'_, str> = if text.contains(',') {
            Cow::Owned(text.replacen(',', ".", 1))
        } else {
            Cow::Borrowed(text)
        };

        if let Some(utc) = text.strip_suffix('Z') {
            let naive = parse_naive(utc)?;
            return Some(naive.and_utc().fixed_offset());
        }

        ZONED_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(&text, format).ok())
            .or_else(|| {
                let naive = parse_naive(&text)?;
                self.tz.from_local_datetime(&naive).single()
            })
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

impl TimestampParser for FuzzyParser {
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a> {
        let Some(caps) = CANDIDATE.captures(line) else {
            return ParseOutcome::Unrecognized;
        };
        let (Some(whole), Some(date)) = (caps.get(0), caps.get(1)) else {
            return ParseOutcome::Unrecognized;
        };

        let rest = &line[whole.end()..];
        self.timestamp(date.as_str())
            .map(|timestamp| ParsedLine {
                timestamp,
                raw_timestamp: whole.as_str(),
                remainder: rest.strip_prefix(' ').unwrap_or(rest),
            })
            .into()
    }

    fn format(&self) -> LogFormat {
        LogFormat::Fuzzy
    }
}
