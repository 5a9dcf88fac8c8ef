//! Due date normalization.

use chrono::format::ParseErrorKind;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExtractionError;
use crate::models::record::INVALID_DATE;

/// Formats tried in order: day/month/year with slashes, then ISO.
pub const DEFAULT_DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// Output format for normalized dates.
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    // chrono's %Y takes any digit count; the built-in formats need four
    static ref DAY_MONTH_YEAR_SHAPE: Regex = Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap();
    static ref ISO_SHAPE: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap();
}

/// Token shape required by a built-in format, if `format` is one.
fn builtin_shape(format: &str) -> Option<&'static Regex> {
    match format {
        "%d/%m/%Y" => Some(&*DAY_MONTH_YEAR_SHAPE),
        "%Y-%m-%d" => Some(&*ISO_SHAPE),
        _ => None,
    }
}

/// Parse a raw date token against each format in turn.
///
/// Returns `Ok(None)` when no format matches. The built-in formats only
/// accept four-digit years. A malformed format string is an error rather
/// than a non-match.
pub fn parse_due_date<S: AsRef<str>>(
    raw: &str,
    formats: &[S],
) -> Result<Option<NaiveDate>, ExtractionError> {
    for format in formats {
        let format = format.as_ref();
        if builtin_shape(format).is_some_and(|shape| !shape.is_match(raw)) {
            continue;
        }
        match NaiveDate::parse_from_str(raw, format) {
            Ok(date) => return Ok(Some(date)),
            Err(e) if e.kind() == ParseErrorKind::BadFormat => {
                return Err(ExtractionError::DateFormat(format.to_string()));
            }
            Err(_) => continue,
        }
    }
    Ok(None)
}

/// Normalize a raw token to `YYYY-MM-DD` using the default formats, or
/// return `"Invalid Date"`.
pub fn normalize_due_date(raw: &str) -> String {
    match parse_due_date(raw.trim(), &DEFAULT_DATE_FORMATS) {
        Ok(Some(date)) => date.format(OUTPUT_DATE_FORMAT).to_string(),
        _ => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_month_year() {
        assert_eq!(normalize_due_date("25/12/2023"), "2023-12-25");
    }

    #[test]
    fn test_iso() {
        assert_eq!(normalize_due_date("2023-12-25"), "2023-12-25");
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(normalize_due_date("not-a-date"), "Invalid Date");
        assert_eq!(normalize_due_date("12/25/2023"), "Invalid Date");
        assert_eq!(normalize_due_date("2023/12/25"), "Invalid Date");
        assert_eq!(normalize_due_date("31/02/2024"), "Invalid Date");
        assert_eq!(normalize_due_date(""), "Invalid Date");
    }

    #[test]
    fn test_year_must_have_four_digits() {
        assert_eq!(normalize_due_date("25/12/23"), "Invalid Date");
        assert_eq!(normalize_due_date("25/12/202"), "Invalid Date");
        assert_eq!(normalize_due_date("25/12/20231"), "Invalid Date");
        assert_eq!(normalize_due_date("999-01-01"), "Invalid Date");
        assert_eq!(normalize_due_date("23-12-25"), "Invalid Date");
    }

    #[test]
    fn test_zero_padded_year_and_short_day_month() {
        assert_eq!(normalize_due_date("25/12/0023"), "0023-12-25");
        assert_eq!(normalize_due_date("5/1/2024"), "2024-01-05");
        assert_eq!(normalize_due_date("2024-1-5"), "2024-01-05");
    }

    #[test]
    fn test_custom_formats_skip_shape_check() {
        let date = parse_due_date("15.04.24", &["%d.%m.%y"]).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 4, 15));
    }

    #[test]
    fn test_trailing_characters_rejected() {
        assert_eq!(normalize_due_date("25/12/2023-"), "Invalid Date");
    }

    #[test]
    fn test_first_matching_format_wins() {
        let date = parse_due_date("01/02/2024", &["%m/%d/%Y", "%d/%m/%Y"]).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_bad_format_is_an_error() {
        let result = parse_due_date("01/02/2024", &["%Q"]);
        assert!(matches!(result, Err(ExtractionError::DateFormat(ref f)) if f == "%Q"));
    }
}
