//! UTC offsets and date assembly from individually matched fields.
//!
//! The structured recognizers pull numeric groups out of a regex match
//! and rebuild the instant here instead of handing the whole string to
//! a general date parser.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OffsetError {
    #[error("Invalid timezone: {0} (expected +HHMM or -HHMM)")]
    Malformed(String),

    #[error("Invalid timezone sign: {0}")]
    Sign(String),

    #[error("Timezone out of range: {0}")]
    OutOfRange(String),
}

/// Parse a `+HHMM` / `-HHMM` offset, as accepted for the default timezone.
pub fn parse_utc_offset(spec: &str) -> Result<FixedOffset, OffsetError> {
    if spec.len() != 5 || !spec.is_char_boundary(1) || !spec.is_char_boundary(3) {
        return Err(OffsetError::Malformed(spec.to_string()));
    }
    let (sign, digits) = spec.split_at(1);
    let (hours, minutes) = digits.split_at(2);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OffsetError::Malformed(spec.to_string()));
    }
    match sign {
        "+" | "-" => {}
        other => return Err(OffsetError::Sign(other.to_string())),
    }
    fixed_offset(sign, hours, minutes).ok_or_else(|| OffsetError::OutOfRange(spec.to_string()))
}

/// Build an offset from already-matched sign, hour and minute groups.
pub fn fixed_offset(sign: &str, hours: &str, minutes: &str) -> Option<FixedOffset> {
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    match sign {
        "+" => FixedOffset::east_opt(seconds),
        "-" => FixedOffset::west_opt(seconds),
        _ => None,
    }
}

/// Scale a run of fractional-second digits to nanoseconds.
///
/// `"239"` is 239ms, `"525234"` is 525234µs; digits past nanosecond
/// precision are truncated.
pub fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let significant = &digits[..digits.len().min(9)];
    let value: u32 = significant.parse().ok()?;
    Some(value * 10u32.pow(9 - significant.len() as u32))
}

/// Numeric date and time fields as matched from a line.
#[derive(Debug, Clone, Copy)]
pub struct DateFields<'a> {
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: &'a str,
    pub fraction: &'a str,
}

impl DateFields<'_> {
    pub fn in_zone(&self, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
        let date = NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )?;
        let naive = date.and_hms_nano_opt(
            self.hour.parse().ok()?,
            self.minute.parse().ok()?,
            self.second.parse().ok()?,
            fraction_nanos(self.fraction)?,
        )?;
        tz.from_local_datetime(&naive).single()
    }
}
