//! ISO 8601 parsing and formatting for `DateTime` attribute values.
//!
//! Brokers accept `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` with optional fractional
//! seconds and optional `Z`/`±HH:MM` offset (a missing offset means UTC), and
//! render timestamps with millisecond precision (`2017-06-17T07:21:24.238Z`).
//!
//! Values are represented as microseconds since the Unix epoch plus the UTC
//! offset, in minutes, the text was written with.

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// Largest UTC offset magnitude, in minutes (`±23:59`).
pub const MAX_OFFSET_MIN: i16 = 23 * 60 + 59;

/// Four-digit years only: 0000-01-01 is day -719528, 10000-01-01 is day 2932897.
const MIN_LOCAL_MICROS: i64 = -719_528 * MICROS_PER_DAY;
const MAX_LOCAL_MICROS: i64 = 2_932_897 * MICROS_PER_DAY - 1;

/// Error type for ISO 8601 parsing and formatting failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeError {
    pub message: String,
}

impl DateTimeError {
    fn new(what: &str, input: &str) -> Self {
        DateTimeError {
            message: format!("{} in datetime: {}", what, input),
        }
    }
}

impl std::fmt::Display for DateTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeError {}

/// Parses a `Z`, `+HH:MM` or `-HH:MM` suffix into minutes.
fn parse_offset(offset: &str, input: &str) -> Result<i16, DateTimeError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    let bytes = offset.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return Err(DateTimeError::new("Invalid timezone offset", input));
    }

    let sign: i16 = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(DateTimeError::new("Invalid timezone offset", input)),
    };

    let hours = parse_digits(&offset[1..3], "Invalid timezone offset", input)? as i16;
    let minutes = parse_digits(&offset[4..6], "Invalid timezone offset", input)? as i16;

    let total = hours * 60 + minutes;
    if minutes > 59 || total > MAX_OFFSET_MIN {
        return Err(DateTimeError::new("Timezone offset out of range", input));
    }

    Ok(sign * total)
}

fn format_offset(offset_min: i16) -> String {
    if offset_min == 0 {
        return "Z".to_string();
    }

    let sign = if offset_min > 0 { '+' } else { '-' };
    let abs = offset_min.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Parses a fixed-width run of ASCII digits.
fn parse_digits(s: &str, what: &str, input: &str) -> Result<i64, DateTimeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeError::new(what, input));
    }
    s.parse().map_err(|_| DateTimeError::new(what, input))
}

/// Fractional seconds digits to microseconds; digits past the sixth are dropped.
fn fraction_to_micros(frac: &str) -> i64 {
    let mut micros = 0i64;
    for (i, b) in frac.bytes().take(6).enumerate() {
        micros += i64::from(b - b'0') * 10i64.pow(5 - i as u32);
    }
    micros
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 (Howard Hinnant's `days_from_civil`).
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let m = i64::from(month);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
    (year, month, day)
}

/// Parses an ISO 8601 datetime and returns microseconds since the Unix epoch
/// together with the offset (in minutes) the text was written with.
pub fn parse_datetime(input: &str) -> Result<(i64, i16), DateTimeError> {
    if !input.is_ascii() || input.len() < 10 {
        return Err(DateTimeError::new("Invalid format", input));
    }

    let date = &input[..10];
    if date.as_bytes()[4] != b'-' || date.as_bytes()[7] != b'-' {
        return Err(DateTimeError::new("Invalid date", input));
    }
    let year = parse_digits(&date[..4], "Invalid year", input)? as i32;
    let month = parse_digits(&date[5..7], "Invalid month", input)? as u32;
    let day = parse_digits(&date[8..10], "Invalid day", input)? as u32;

    if !(1..=12).contains(&month) {
        return Err(DateTimeError::new("Invalid month", input));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(DateTimeError::new("Invalid day", input));
    }

    let days = days_from_civil(year, month, day);

    // Date-only form: midnight UTC.
    if input.len() == 10 {
        return Ok((days * MICROS_PER_DAY, 0));
    }

    if input.as_bytes()[10] != b'T' {
        return Err(DateTimeError::new("Invalid date/time separator", input));
    }

    let time = &input[11..];
    if time.len() < 8 || time.as_bytes()[2] != b':' || time.as_bytes()[5] != b':' {
        return Err(DateTimeError::new("Invalid time", input));
    }
    let hours = parse_digits(&time[..2], "Invalid hours", input)?;
    let minutes = parse_digits(&time[3..5], "Invalid minutes", input)?;
    let seconds = parse_digits(&time[6..8], "Invalid seconds", input)?;

    if hours > 23 {
        return Err(DateTimeError::new("Invalid hours", input));
    }
    if minutes > 59 {
        return Err(DateTimeError::new("Invalid minutes", input));
    }
    if seconds > 59 {
        return Err(DateTimeError::new("Invalid seconds", input));
    }

    let mut rest = &time[8..];
    let mut micros = 0;
    if let Some(frac_and_tz) = rest.strip_prefix('.') {
        let end = frac_and_tz
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(frac_and_tz.len());
        if end == 0 {
            return Err(DateTimeError::new("Invalid fractional seconds", input));
        }
        micros = fraction_to_micros(&frac_and_tz[..end]);
        rest = &frac_and_tz[end..];
    }

    let offset_min = if rest.is_empty() { 0 } else { parse_offset(rest, input)? };

    let local = days * MICROS_PER_DAY
        + hours * MICROS_PER_HOUR
        + minutes * MICROS_PER_MINUTE
        + seconds * MICROS_PER_SECOND
        + micros;

    Ok((local - i64::from(offset_min) * MICROS_PER_MINUTE, offset_min))
}

/// Formats microseconds since the Unix epoch as an ISO 8601 datetime in the
/// given offset. Millisecond precision is used unless the value carries
/// sub-millisecond digits.
///
/// Fails if the offset exceeds `±23:59` or the local time falls outside
/// years 0000 to 9999, so the output always parses with [`parse_datetime`].
pub fn format_datetime(epoch_micros: i64, offset_min: i16) -> Result<String, DateTimeError> {
    if offset_min.unsigned_abs() > MAX_OFFSET_MIN.unsigned_abs() {
        return Err(DateTimeError {
            message: format!("Timezone offset out of range: {} minutes", offset_min),
        });
    }
    let local = epoch_micros
        .checked_add(i64::from(offset_min) * MICROS_PER_MINUTE)
        .filter(|local| (MIN_LOCAL_MICROS..=MAX_LOCAL_MICROS).contains(local))
        .ok_or_else(|| DateTimeError {
            message: format!("Timestamp out of range: {} microseconds", epoch_micros),
        })?;
    let days = local.div_euclid(MICROS_PER_DAY);
    let time = local.rem_euclid(MICROS_PER_DAY);

    let (year, month, day) = civil_from_days(days);
    let hours = time / MICROS_PER_HOUR;
    let minutes = time % MICROS_PER_HOUR / MICROS_PER_MINUTE;
    let seconds = time % MICROS_PER_MINUTE / MICROS_PER_SECOND;
    let micros = time % MICROS_PER_SECOND;

    let frac = if micros % 1000 == 0 {
        format!("{:03}", micros / 1000)
    } else {
        format!("{:06}", micros)
    };

    Ok(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{}{}",
        year,
        month,
        day,
        hours,
        minutes,
        seconds,
        frac,
        format_offset(offset_min)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_broker_timestamp() {
        let (epoch_micros, offset) = parse_datetime("2017-06-17T07:21:24.238Z").unwrap();
        assert_eq!(epoch_micros, 1_497_684_084_238_000);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_datetime("1970-01-01").unwrap(), (0, 0));
        assert_eq!(parse_datetime("1970-01-01T00:00:00").unwrap(), (0, 0));
        assert_eq!(parse_datetime("1970-01-01T00:00:01Z").unwrap(), (1_000_000, 0));
        assert_eq!(
            parse_datetime("2024-03-15T14:30:00.123456Z").unwrap(),
            (1_710_513_000_123_456, 0)
        );
        // Digits past microseconds are dropped.
        assert_eq!(
            parse_datetime("2024-03-15T14:30:00.1234567Z").unwrap(),
            (1_710_513_000_123_456, 0)
        );
    }

    #[test]
    fn test_parse_with_offset() {
        let (epoch_micros, offset) = parse_datetime("2024-03-15T14:30:00+05:30").unwrap();
        assert_eq!(offset, 330);
        let (utc, _) = parse_datetime("2024-03-15T09:00:00Z").unwrap();
        assert_eq!(epoch_micros, utc);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_datetime(0, 0).unwrap(), "1970-01-01T00:00:00.000Z");
        assert_eq!(
            format_datetime(1_497_684_084_238_000, 0).unwrap(),
            "2017-06-17T07:21:24.238Z"
        );
        assert_eq!(
            format_datetime(1_710_513_000_123_456, 0).unwrap(),
            "2024-03-15T14:30:00.123456Z"
        );
        assert_eq!(
            format_datetime(1_710_493_200_000_000, -300).unwrap(),
            "2024-03-15T04:00:00.000-05:00"
        );
    }

    #[test]
    fn test_before_epoch() {
        let (epoch_micros, _) = parse_datetime("1969-12-31T23:59:59Z").unwrap();
        assert_eq!(epoch_micros, -1_000_000);
        assert_eq!(format_datetime(epoch_micros, 0).unwrap(), "1969-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_roundtrip_preserves_offset() {
        for text in [
            "2000-02-29T12:00:00.000Z",
            "2024-12-31T23:59:59.999Z",
            "2024-03-15T14:30:00.000+05:30",
        ] {
            let (epoch_micros, offset) = parse_datetime(text).unwrap();
            assert_eq!(format_datetime(epoch_micros, offset).unwrap(), text);
        }
    }

    #[test]
    fn test_format_rejects_offset_out_of_range() {
        assert!(format_datetime(0, 1500).is_err());
        assert!(format_datetime(0, -1500).is_err());
        assert!(format_datetime(0, i16::MIN).is_err());
        assert_eq!(
            format_datetime(0, MAX_OFFSET_MIN).unwrap(),
            "1970-01-01T23:59:00.000+23:59"
        );
        assert!(parse_datetime("1970-01-01T00:00:00+24:00").is_err());
    }

    #[test]
    fn test_format_rejects_timestamp_out_of_range() {
        assert!(format_datetime(i64::MAX, 60).is_err());
        assert!(format_datetime(i64::MIN, -60).is_err());
        // First and last instants with a four-digit year.
        let first = format_datetime(MIN_LOCAL_MICROS, 0).unwrap();
        assert_eq!(first, "0000-01-01T00:00:00.000Z");
        let last = format_datetime(MAX_LOCAL_MICROS, 0).unwrap();
        assert_eq!(last, "9999-12-31T23:59:59.999999Z");
        assert_eq!(parse_datetime(&last).unwrap(), (MAX_LOCAL_MICROS, 0));
        assert!(format_datetime(MAX_LOCAL_MICROS + 1, 0).is_err());
        // In range as UTC, out of range once the offset is applied.
        assert!(format_datetime(MAX_LOCAL_MICROS, 1).is_err());
    }

    #[test]
    fn test_invalid() {
        assert!(parse_datetime("2024-13-01").is_err());
        assert!(parse_datetime("2023-02-29").is_err());
        assert!(parse_datetime("2024-03-15 14:30:00").is_err());
        assert!(parse_datetime("2024-03-15T24:00:00Z").is_err());
        assert!(parse_datetime("2024-03-15T14:30:00.Z").is_err());
        assert!(parse_datetime("2024-03-15T14:30:00+5:30").is_err());
        assert!(parse_datetime("not a date").is_err());
    }
}
