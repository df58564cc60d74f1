//! Date parsing for date sort columns.
//!
//! Patterns are tried in a fixed order and the first that yields a valid
//! calendar date wins. The order is ambiguous by construction: `01/02/2020`
//! is read as day/month because `DD/MM/YYYY` precedes `MM/DD/YYYY`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

/// A date pattern with named `y`, `m` and `d` groups; absent month or day
/// default to 1.
struct DatePattern {
    format: &'static str,
    regex: Regex,
}

impl DatePattern {
    fn new(format: &'static str, pattern: &str) -> Self {
        Self {
            format,
            regex: Regex::new(pattern).expect("Invalid date pattern"),
        }
    }

    fn parse(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.regex.captures(text)?;
        let number = |name: &str| caps.name(name).map(|m| m.as_str().parse::<u32>());

        let year = caps.name("y")?.as_str().parse::<i32>().ok()?;
        let month = number("m").transpose().ok()?.unwrap_or(1);
        let day = number("d").transpose().ok()?.unwrap_or(1);
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        DatePattern::new("YYYY-MM-DD", r"^(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})$"),
        DatePattern::new("YYYY/MM/DD", r"^(?P<y>\d{4})/(?P<m>\d{1,2})/(?P<d>\d{1,2})$"),
        DatePattern::new("DD-MM-YYYY", r"^(?P<d>\d{1,2})-(?P<m>\d{1,2})-(?P<y>\d{4})$"),
        DatePattern::new("DD/MM/YYYY", r"^(?P<d>\d{1,2})/(?P<m>\d{1,2})/(?P<y>\d{4})$"),
        DatePattern::new("YYYY", r"^(?P<y>\d{4})$"),
        DatePattern::new("YYYY-MM", r"^(?P<y>\d{4})-(?P<m>\d{1,2})$"),
        DatePattern::new("MM-YYYY", r"^(?P<m>\d{1,2})-(?P<y>\d{4})$"),
        DatePattern::new("MM/DD/YYYY", r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})$"),
        DatePattern::new("DD.MM.YYYY", r"^(?P<d>\d{1,2})\.(?P<m>\d{1,2})\.(?P<y>\d{4})$"),
        DatePattern::new("YYYY.MM.DD", r"^(?P<y>\d{4})\.(?P<m>\d{1,2})\.(?P<d>\d{1,2})$"),
    ]
});

/// Result of [`parse_date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDate {
    Date(NaiveDate),
    /// No pattern matched; the trimmed input is kept.
    Unparsed(String),
}

impl ParsedDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ParsedDate::Date(date) => Some(*date),
            ParsedDate::Unparsed(_) => None,
        }
    }
}

/// Formats tried by [`parse_date`], in order.
pub fn date_formats() -> impl Iterator<Item = &'static str> {
    DATE_PATTERNS.iter().map(|p| p.format)
}

/// Parse `text` with the first matching pattern.
///
/// Logs a warning and returns the trimmed text when nothing matches.
///
/// ```
/// use chrono::NaiveDate;
/// use csvtidy::{ParsedDate, parse_date};
///
/// assert_eq!(
///     parse_date("2020-01-15"),
///     ParsedDate::Date(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap())
/// );
/// assert_eq!(parse_date("not-a-date"), ParsedDate::Unparsed("not-a-date".into()));
/// ```
pub fn parse_date(text: &str) -> ParsedDate {
    let text = text.trim();

    match DATE_PATTERNS.iter().find_map(|p| p.parse(text)) {
        Some(date) => ParsedDate::Date(date),
        None => {
            warn!(value = text, "Could not parse date");
            ParsedDate::Unparsed(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> ParsedDate {
        ParsedDate::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date("2020-01-15"), ymd(2020, 1, 15));
        assert_eq!(parse_date(" 2020-1-5 "), ymd(2020, 1, 5));
    }

    #[test]
    fn test_slashed_year_first_and_dashed_day_first() {
        assert_eq!(parse_date("2020/01/15"), ymd(2020, 1, 15));
        assert_eq!(parse_date("15-01-2020"), ymd(2020, 1, 15));
    }

    #[test]
    fn test_partial_dates_default_to_first() {
        assert_eq!(parse_date("1999"), ymd(1999, 1, 1));
        assert_eq!(parse_date("2021-07"), ymd(2021, 7, 1));
        assert_eq!(parse_date("07-2021"), ymd(2021, 7, 1));
    }

    #[test]
    fn test_day_first_wins_when_ambiguous() {
        assert_eq!(parse_date("01/02/2020"), ymd(2020, 2, 1));
        // month 13 is invalid day-first, so the US pattern takes over
        assert_eq!(parse_date("12/13/2020"), ymd(2020, 12, 13));
    }

    #[test]
    fn test_dotted_formats() {
        assert_eq!(parse_date("31.12.1999"), ymd(1999, 12, 31));
        assert_eq!(parse_date("1999.12.31"), ymd(1999, 12, 31));
    }

    #[test]
    fn test_invalid_calendar_date() {
        assert_eq!(
            parse_date("2021-02-30"),
            ParsedDate::Unparsed("2021-02-30".to_string())
        );
    }

    #[test]
    fn test_unparsed_is_returned_trimmed() {
        assert_eq!(
            parse_date("  not-a-date "),
            ParsedDate::Unparsed("not-a-date".to_string())
        );
        assert_eq!(parse_date("not-a-date").as_date(), None);
    }

    #[test]
    fn test_format_order() {
        let formats: Vec<_> = date_formats().collect();
        assert_eq!(formats.len(), 10);
        assert_eq!(formats[0], "YYYY-MM-DD");
        assert_eq!(formats[9], "YYYY.MM.DD");
    }
}
