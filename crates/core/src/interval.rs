//! Interval and date argument parsing.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use crate::error::{Error, Result};
use crate::types::{parse_timestamp_with, Timestamp};

/// Format of command-line date arguments (e.g. `20240102_09:30:00.000`).
pub const DATE_ARG_FORMAT: &str = "%Y%m%d_%H:%M:%S%.f";

fn interval_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)([smhd])").expect("valid interval regex"))
}

/// Parse an interval such as `30s`, `5m`, `1h30m` or `1d`.
///
/// Components are summed; a repeated unit adds up (`1m1m` == `2m`). Input
/// with no components, or a zero total, is a configuration error; a
/// component too large to represent is a parse error.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let mut total = Duration::zero();
    let mut matched = false;

    for caps in interval_pattern().captures_iter(s) {
        let value: i64 = caps[1]
            .parse()
            .map_err(|_| Error::parse(format!("interval component too large in '{}'", s)))?;
        let component = match &caps[2] {
            "s" => Duration::try_seconds(value),
            "m" => Duration::try_minutes(value),
            "h" => Duration::try_hours(value),
            "d" => Duration::try_days(value),
            _ => None,
        }
        .ok_or_else(|| Error::parse(format!("interval out of range: '{}'", s)))?;

        total = total
            .checked_add(&component)
            .ok_or_else(|| Error::parse(format!("interval out of range: '{}'", s)))?;
        matched = true;
    }

    if !matched {
        return Err(Error::config(format!(
            "no interval components in '{}' (expected e.g. 1h30m)",
            s
        )));
    }
    if total <= Duration::zero() {
        return Err(Error::config(format!("interval must be positive: '{}'", s)));
    }
    Ok(total)
}

/// Parse a command-line date argument in [`DATE_ARG_FORMAT`].
pub fn parse_date_arg(s: &str) -> Result<Timestamp> {
    parse_timestamp_with(s, DATE_ARG_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_interval("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_interval("5m").unwrap(), Duration::minutes(5));
        assert_eq!(parse_interval("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_interval("1d").unwrap(), Duration::days(1));
    }

    #[test]
    fn test_compound_interval() {
        let expected = Duration::hours(1) + Duration::minutes(30);
        assert_eq!(parse_interval("1h30m").unwrap(), expected);

        let expected = Duration::days(1) + Duration::hours(2) + Duration::seconds(5);
        assert_eq!(parse_interval("1d2h5s").unwrap(), expected);
    }

    #[test]
    fn test_invalid_interval() {
        assert!(matches!(parse_interval("abc"), Err(Error::Config(_))));
        assert!(matches!(parse_interval(""), Err(Error::Config(_))));
        assert!(matches!(parse_interval("0m"), Err(Error::Config(_))));
        assert!(matches!(
            parse_interval("99999999999999999999s"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_parse_date_arg() {
        let parsed = parse_date_arg("20240102_09:30:00.000").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parsed, expected);
        assert!(parse_date_arg("2024-01-02").is_err());
    }
}
