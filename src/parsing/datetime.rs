//! Date and time token normalization.
//!
//! Exports write dates day-first or month-first, with 2- or 4-digit years,
//! and times in 12- or 24-hour notation with or without seconds. Everything
//! is normalized to `DD/MM/YYYY` and `HH:MM`.
//!
//! Both functions are total: a token that fits no known layout comes back
//! verbatim, so callers can detect it with [`is_canonical_date`] /
//! [`is_canonical_time`].
//!
//! Day-first vs month-first is settled by "first layout that parses", in the
//! order listed in [`DATE_FORMATS`]. `03/04/2023` is therefore always the 3rd
//! of April, even in a month-first export.
//!
//! Two-digit years `00`-`68` fall in the 2000s and `69`-`99` in the 1900s.

use chrono::{Datelike, NaiveDate, NaiveTime};

/// Date layouts tried in order, with the year width each expects.
///
/// chrono's `%Y` also accepts short years, so the width is checked
/// separately.
pub const DATE_FORMATS: &[(&str, usize)] = &[
    ("%d/%m/%y", 2),
    ("%d/%m/%Y", 4),
    ("%m/%d/%y", 2),
    ("%m/%d/%Y", 4),
];

/// Time layouts tried in order: 12h with seconds, 12h, 24h with seconds, 24h.
pub const TIME_FORMATS: &[&str] = &["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"];

const CANONICAL_DATE: &str = "%d/%m/%Y";
const CANONICAL_TIME: &str = "%H:%M";

fn strip_token(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_whitespace() || c == '[' || c == ']')
}

/// Normalizes a date token to `DD/MM/YYYY`.
///
/// # Example
///
/// ```rust
/// use chatroster::parsing::datetime::normalize_date;
///
/// assert_eq!(normalize_date("12/05/23"), "12/05/2023");
/// assert_eq!(normalize_date("[1/2/2024"), "01/02/2024");
/// assert_eq!(normalize_date("12/25/2023"), "25/12/2023");
/// assert_eq!(normalize_date("yesterday"), "yesterday");
/// ```
pub fn normalize_date(token: &str) -> String {
    resolve_date(token)
        .map(|date| date.format(CANONICAL_DATE).to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Resolves a date token to a calendar date, if any layout fits.
pub fn resolve_date(token: &str) -> Option<NaiveDate> {
    let stripped = strip_token(token);
    // Some exports hand over "date, time" as one token.
    let date_part = stripped.split(',').next().unwrap_or(stripped).trim();
    let year_width = date_part.rsplit('/').next().map_or(0, str::len);

    DATE_FORMATS
        .iter()
        .filter(|(_, width)| *width == year_width)
        .find_map(|(format, width)| {
            let date = NaiveDate::parse_from_str(date_part, format).ok()?;
            if *width == 2 {
                pivot_century(date)
            } else {
                Some(date)
            }
        })
}

/// chrono reads `%y` as 1970-2069; exports mean 1969-2068.
fn pivot_century(date: NaiveDate) -> Option<NaiveDate> {
    if date.year() >= 2069 {
        date.with_year(date.year() - 100)
    } else {
        Some(date)
    }
}

/// Normalizes a time token to 24-hour `HH:MM`, dropping seconds.
///
/// # Example
///
/// ```rust
/// use chatroster::parsing::datetime::normalize_time;
///
/// assert_eq!(normalize_time("10:30 am"), "10:30");
/// assert_eq!(normalize_time("10:30:15 PM"), "22:30");
/// assert_eq!(normalize_time("07:05:59"), "07:05");
/// assert_eq!(normalize_time("25:99"), "25:99");
/// ```
pub fn normalize_time(token: &str) -> String {
    resolve_time(token)
        .map(|time| time.format(CANONICAL_TIME).to_string())
        .unwrap_or_else(|| token.to_string())
}

/// Resolves a time token to a clock time, if any layout fits.
pub fn resolve_time(token: &str) -> Option<NaiveTime> {
    let stripped = strip_token(token);
    let time_part = match stripped.split_once(", ") {
        Some((_, time)) => time,
        None => stripped,
    };

    let candidate = canonical_clock(time_part)?;

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&candidate, format).ok())
}

/// Rewrites `10:30pm`, `10:30 p.m.` or `10:30\u{202f}PM` as `10:30 PM`.
fn canonical_clock(token: &str) -> Option<String> {
    let compact: String = token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect::<String>()
        .to_ascii_uppercase();

    if compact.is_empty() {
        return None;
    }

    for marker in ["AM", "PM"] {
        if let Some(clock) = compact.strip_suffix(marker) {
            return Some(format!("{clock} {marker}"));
        }
    }
    Some(compact)
}

/// Returns `true` if `s` is a fully resolved `DD/MM/YYYY` date.
pub fn is_canonical_date(s: &str) -> bool {
    s.len() == 10
        && NaiveDate::parse_from_str(s, CANONICAL_DATE)
            .is_ok_and(|d| d.format(CANONICAL_DATE).to_string() == s)
}

/// Returns `true` if `s` is a fully resolved `HH:MM` time.
pub fn is_canonical_time(s: &str) -> bool {
    s.len() == 5
        && NaiveTime::parse_from_str(s, CANONICAL_TIME)
            .is_ok_and(|t| t.format(CANONICAL_TIME).to_string() == s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_first_two_digit_year() {
        assert_eq!(normalize_date("12/05/23"), "12/05/2023");
        assert_eq!(normalize_date("1/2/24"), "01/02/2024");
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(normalize_date("01/01/68"), "01/01/2068");
        assert_eq!(normalize_date("01/01/69"), "01/01/1969");
        assert_eq!(normalize_date("31/12/70"), "31/12/1970");
        assert_eq!(normalize_date("12/25/69"), "25/12/1969");
        // Four-digit years are taken as written.
        assert_eq!(normalize_date("01/01/2069"), "01/01/2069");
    }

    #[test]
    fn test_day_first_four_digit_year() {
        assert_eq!(normalize_date("12/05/2023"), "12/05/2023");
        assert_eq!(normalize_date("31/12/2023"), "31/12/2023");
    }

    #[test]
    fn test_month_first_when_day_first_fails() {
        assert_eq!(normalize_date("12/25/23"), "25/12/2023");
        assert_eq!(normalize_date("2/29/2024"), "29/02/2024");
    }

    #[test]
    fn test_ambiguous_date_prefers_day_first() {
        // 3 April, not 4 March.
        assert_eq!(normalize_date("03/04/2023"), "03/04/2023");
    }

    #[test]
    fn test_brackets_and_trailing_time_stripped() {
        assert_eq!(normalize_date("[12/05/2023"), "12/05/2023");
        assert_eq!(normalize_date(" 12/05/23 "), "12/05/2023");
        assert_eq!(normalize_date("12/05/23, 10:30 am"), "12/05/2023");
    }

    #[test]
    fn test_date_passthrough() {
        for token in ["", "yesterday", "32/13/2023", "12-05-2023", "12/05/123", "1/2/3/4"] {
            assert_eq!(normalize_date(token), token, "token {token:?}");
        }
        assert_eq!(normalize_date("  30/02/2023 "), "  30/02/2023 ");
    }

    #[test]
    fn test_date_idempotent() {
        for token in ["12/05/23", "5/6/2021", "12/25/23", "01/01/2000"] {
            let once = normalize_date(token);
            assert_eq!(normalize_date(&once), once);
        }
    }

    #[test]
    fn test_twelve_hour_times() {
        assert_eq!(normalize_time("10:30 am"), "10:30");
        assert_eq!(normalize_time("10:30 PM"), "22:30");
        assert_eq!(normalize_time("12:05 am"), "00:05");
        assert_eq!(normalize_time("12:05 pm"), "12:05");
        assert_eq!(normalize_time("9:07pm"), "21:07");
        assert_eq!(normalize_time("9:07 p.m."), "21:07");
    }

    #[test]
    fn test_twelve_hour_with_seconds() {
        assert_eq!(normalize_time("10:30:15 AM"), "10:30");
        assert_eq!(normalize_time("[10:30:15 AM]"), "10:30");
        assert_eq!(normalize_time("11:59:59\u{202f}PM"), "23:59");
    }

    #[test]
    fn test_twenty_four_hour_times() {
        assert_eq!(normalize_time("22:30"), "22:30");
        assert_eq!(normalize_time("7:05"), "07:05");
        assert_eq!(normalize_time("23:59:01"), "23:59");
    }

    #[test]
    fn test_time_with_date_prefix() {
        assert_eq!(normalize_time("12/05/2023, 10:30:15 AM"), "10:30");
    }

    #[test]
    fn test_time_passthrough() {
        for token in ["", "noon", "25:99", "13:00 PM", "10h30"] {
            assert_eq!(normalize_time(token), token, "token {token:?}");
        }
    }

    #[test]
    fn test_time_idempotent() {
        for token in ["10:30 am", "22:30", "10:30:15 PM", "00:00"] {
            let once = normalize_time(token);
            assert_eq!(normalize_time(&once), once);
        }
    }

    #[test]
    fn test_canonical_checks() {
        assert!(is_canonical_date("12/05/2023"));
        assert!(!is_canonical_date("12/05/23"));
        assert!(!is_canonical_date("1/05/2023"));
        assert!(!is_canonical_date("31/02/2023"));

        assert!(is_canonical_time("09:05"));
        assert!(!is_canonical_time("9:05"));
        assert!(!is_canonical_time("09:05 am"));
        assert!(!is_canonical_time("24:00"));
    }
}
