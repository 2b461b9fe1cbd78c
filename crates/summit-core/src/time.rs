//! Date and time-of-day parsing for wire forms.
//!
//! Dates arrive as `YYYY-MM-DD`; session start times arrive in the compact
//! `HHMM` form (e.g. `0830`). Formatting is the inverse of parsing.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

use crate::error::{CoreError, Result};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour][minute]");

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Longer strings are truncated to the first ten characters, so an
/// RFC 3339 timestamp is accepted and its date part used.
pub fn parse_date(value: &str) -> Result<Date> {
    let prefix = value.get(..10).unwrap_or(value);
    Date::parse(prefix, DATE_FORMAT).map_err(|_| CoreError::invalid_date(value))
}

/// Parse an `HHMM` time of day.
pub fn parse_start_time(value: &str) -> Result<Time> {
    let digits = value.get(..4).unwrap_or(value);
    Time::parse(digits, TIME_FORMAT).map_err(|_| CoreError::invalid_time(value))
}

/// Format a date back to `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format a time of day back to `HHMM`.
pub fn format_start_time(time: Time) -> String {
    time.format(TIME_FORMAT)
        .unwrap_or_else(|_| time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2016-01-17").unwrap(), date!(2016 - 01 - 17));
        // Timestamp prefix is accepted
        assert_eq!(
            parse_date("2016-01-17T09:00:00Z").unwrap(),
            date!(2016 - 01 - 17)
        );
        assert!(parse_date("17-01-2016").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_start_time() {
        assert_eq!(parse_start_time("0830").unwrap(), time!(08:30));
        assert_eq!(parse_start_time("1900").unwrap(), time!(19:00));
        assert!(parse_start_time("8:30").is_err());
        assert!(parse_start_time("2561").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!(format_date(date!(2016 - 01 - 17)), "2016-01-17");
        assert_eq!(format_start_time(time!(08:30)), "0830");
    }
}
