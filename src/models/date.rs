//! Lenient date parsing for user input and imports
//!
//! Formats are tried in a fixed order and the first match wins, so
//! `01-02-2024` is read day-first (1 February 2024), never month-first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{ExpenseError, ExpenseResult};

/// Canonical storage format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Day-first formats tried after the canonical one, with their separator
const DAY_FIRST_FORMATS: [(&str, char); 2] = [("%d-%m-%Y", '-'), ("%d/%m/%Y", '/')];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a user-supplied date, treating empty input, `today` and `t` as today
pub fn parse_date(text: &str) -> ExpenseResult<NaiveDate> {
    parse_date_relative_to(text, today())
}

/// Parse an optional range bound: empty input means "no bound"
pub fn parse_optional_date(text: Option<&str>) -> ExpenseResult<Option<NaiveDate>> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// [`parse_date`] with an explicit notion of "today"
pub fn parse_date_relative_to(text: &str, today: NaiveDate) -> ExpenseResult<NaiveDate> {
    let text = text.trim();
    let lowered = text.to_lowercase();
    if text.is_empty() || lowered == "today" || lowered == "t" {
        return Ok(today);
    }

    if year_has_four_digits(text, '-', true) {
        if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
            return Ok(date);
        }
    }

    for (format, separator) in DAY_FIRST_FORMATS {
        if !year_has_four_digits(text, separator, false) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    parse_timestamp(text).ok_or_else(|| ExpenseError::DateFormat(text.to_string()))
}

/// Last resort: ISO 8601 calendar timestamps
fn parse_timestamp(text: &str) -> Option<NaiveDate> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    // compact YYYYMMDD
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        let year = text[..4].parse().ok()?;
        let month = text[4..6].parse().ok()?;
        let day = text[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// chrono's `%Y` accepts any number of digits; user dates need exactly four
fn year_has_four_digits(text: &str, separator: char, year_first: bool) -> bool {
    let part = if year_first {
        text.split(separator).next()
    } else {
        text.rsplit(separator).next()
    };
    part.is_some_and(|p| p.len() == 4 && p.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_today() -> NaiveDate {
        ymd(2024, 6, 30)
    }

    #[test]
    fn test_today_tokens() {
        for input in ["", "   ", "today", "TODAY", "t", " T "] {
            assert_eq!(
                parse_date_relative_to(input, fixed_today()).unwrap(),
                fixed_today(),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(
            parse_date_relative_to("2024-01-05", fixed_today()).unwrap(),
            ymd(2024, 1, 5)
        );
        assert_eq!(
            parse_date_relative_to("2024-1-5", fixed_today()).unwrap(),
            ymd(2024, 1, 5)
        );
    }

    #[test]
    fn test_dash_format_is_day_first() {
        assert_eq!(
            parse_date_relative_to("01-02-2024", fixed_today()).unwrap(),
            ymd(2024, 2, 1)
        );
    }

    #[test]
    fn test_slash_format_is_day_first() {
        assert_eq!(
            parse_date_relative_to("25/12/2023", fixed_today()).unwrap(),
            ymd(2023, 12, 25)
        );
        // month-first reading would be invalid
        assert!(parse_date_relative_to("12/25/2023", fixed_today()).is_err());
    }

    #[test]
    fn test_timestamp_fallback() {
        assert_eq!(
            parse_date_relative_to("2024-03-09T14:30:00", fixed_today()).unwrap(),
            ymd(2024, 3, 9)
        );
        assert_eq!(
            parse_date_relative_to("2024-03-09 08:15", fixed_today()).unwrap(),
            ymd(2024, 3, 9)
        );
        assert_eq!(
            parse_date_relative_to("2024-03-09T23:00:00+05:00", fixed_today()).unwrap(),
            ymd(2024, 3, 9)
        );
        assert_eq!(
            parse_date_relative_to("20240309", fixed_today()).unwrap(),
            ymd(2024, 3, 9)
        );
    }

    #[test]
    fn test_short_years_rejected() {
        assert!(parse_date_relative_to("24-01-05", fixed_today()).is_err());
        assert!(parse_date_relative_to("05/01/24", fixed_today()).is_err());
    }

    #[test]
    fn test_unrecognized_is_date_format_error() {
        let err = parse_date_relative_to("next tuesday", fixed_today()).unwrap_err();
        assert!(matches!(err, ExpenseError::DateFormat(ref s) if s == "next tuesday"));
    }

    #[test]
    fn test_optional_bounds() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-02-29")).unwrap(),
            Some(ymd(2024, 2, 29))
        );
        assert!(parse_optional_date(Some("2023-02-29")).is_err());
    }
}
