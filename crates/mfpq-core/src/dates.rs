//! UTC day arithmetic for first-seen grouping.
//!
//! Day stamps are seconds at UTC midnight. Conversion is plain epoch math
//! with leap-year handling; no leap seconds, no time zones.

pub const SECS_PER_DAY: i64 = 86_400;

/// Start of the UTC day containing `ts_ms`, in seconds since the epoch.
///
/// Floor division, so pre-epoch timestamps land on the correct day too.
pub fn day_start(ts_ms: i64) -> i64 {
    ts_ms.div_euclid(1000).div_euclid(SECS_PER_DAY) * SECS_PER_DAY
}

/// Format a day stamp as `YYYY-MM-DD`.
pub fn format_day(day_secs: i64) -> String {
    let (year, month, day) = ymd_from_days(day_secs.div_euclid(SECS_PER_DAY));
    format!("{year:04}-{month:02}-{day:02}")
}

/// Parse a `YYYY-MM-DD` calendar date into epoch milliseconds at UTC
/// midnight. Returns `None` for anything that is not a valid date with a
/// four-digit year.
pub fn parse_day(s: &str) -> Option<i64> {
    let mut parts = s.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: usize = parts.next()?.parse().ok()?;
    let day: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(1000..=9999).contains(&year) || !(1..=12).contains(&month) {
        return None;
    }
    if day < 1 || day > month_lengths(year)[month - 1] {
        return None;
    }
    Some(days_from_ymd(year, month, day) * SECS_PER_DAY * 1000)
}

/// Convert days-since-epoch to a (year, month, day) civil date.
fn ymd_from_days(mut days: i64) -> (i64, u32, u32) {
    let mut year = 1970i64;
    while days < 0 {
        year -= 1;
        days += days_in_year(year);
    }
    loop {
        let len = days_in_year(year);
        if days < len {
            break;
        }
        days -= len;
        year += 1;
    }

    let mut month = 1u32;
    for len in month_lengths(year) {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    (year, month, days as u32 + 1)
}

/// Convert a civil date to days-since-epoch.
fn days_from_ymd(year: i64, month: usize, day: i64) -> i64 {
    let mut days: i64 = 0;
    if year >= 1970 {
        for y in 1970..year {
            days += days_in_year(y);
        }
    } else {
        for y in year..1970 {
            days -= days_in_year(y);
        }
    }
    for len in &month_lengths(year)[..month - 1] {
        days += len;
    }
    days + day - 1
}

fn days_in_year(year: i64) -> i64 {
    if is_leap(year) { 366 } else { 365 }
}

fn month_lengths(year: i64) -> [i64; 12] {
    if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    }
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // day_start tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_day_start_epoch() {
        assert_eq!(day_start(0), 0);
        assert_eq!(day_start(1), 0);
        assert_eq!(day_start(86_399_999), 0);
        assert_eq!(day_start(86_400_000), 86_400);
    }

    #[test]
    fn test_day_start_midnight_boundary() {
        // 2015-10-28T23:59:59.999Z and 2015-10-29T00:00:00.000Z are one
        // millisecond apart but belong to different days.
        let end_of_day = 1_446_076_799_999;
        let next_day = 1_446_076_800_000;
        assert_eq!(day_start(end_of_day), 1_445_990_400);
        assert_eq!(day_start(next_day), 1_446_076_800);
    }

    #[test]
    fn test_day_start_pre_epoch() {
        // One millisecond before the epoch is still 1969-12-31.
        assert_eq!(day_start(-1), -86_400);
    }

    // -----------------------------------------------------------------------
    // format_day tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_format_day_epoch() {
        assert_eq!(format_day(0), "1970-01-01");
    }

    #[test]
    fn test_format_day_known_dates() {
        // 2000-01-01 00:00:00 UTC = 946684800
        assert_eq!(format_day(946_684_800), "2000-01-01");
        assert_eq!(format_day(1_446_076_800), "2015-10-29");
    }

    #[test]
    fn test_format_day_leap_day() {
        // 2024-02-29 00:00:00 UTC = 1709164800
        assert_eq!(format_day(1_709_164_800), "2024-02-29");
    }

    #[test]
    fn test_format_day_pre_epoch() {
        assert_eq!(format_day(-86_400), "1969-12-31");
    }

    // -----------------------------------------------------------------------
    // parse_day tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_day_round_trips_format_day() {
        for day_secs in [0, 946_684_800, 1_446_076_800, 1_709_164_800] {
            let formatted = format_day(day_secs);
            assert_eq!(parse_day(&formatted), Some(day_secs * 1000));
        }
    }

    #[test]
    fn test_parse_day_rejects_invalid() {
        assert_eq!(parse_day("2015-13-01"), None);
        assert_eq!(parse_day("2015-02-30"), None);
        assert_eq!(parse_day("2023-02-29"), None);
        assert_eq!(parse_day("2015-10"), None);
        assert_eq!(parse_day("2015-10-29-1"), None);
        assert_eq!(parse_day("not-a-date"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_parse_day_accepts_leap_day() {
        assert_eq!(parse_day("2024-02-29"), Some(1_709_164_800_000));
    }

    #[test]
    fn test_is_leap() {
        assert!(is_leap(2000));
        assert!(is_leap(2024));
        assert!(!is_leap(1900));
        assert!(!is_leap(2023));
    }
}
