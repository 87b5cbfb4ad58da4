//! TTL duration parsing.

use crate::error::{Error, Result};

/// Smallest TTL the sweeper will honor. The sweep cadence is 10 seconds, so
/// anything below 5 is indistinguishable from immediate deletion.
pub const MIN_TTL_SECS: u64 = 5;

/// Largest accepted TTL: 10 years. Keeps extreme magnitudes from overflowing
/// deadline arithmetic.
pub const MAX_TTL_SECS: u64 = 315_360_000;

/// Parse a TTL string into effective seconds.
///
/// `"0"` (no suffix) disables tracking. Anything else is an integer magnitude
/// plus a unit suffix: `s` (seconds), `m` (minutes), `h` (hours), `d` (days),
/// `w` (weeks). Examples: `"30s"`, `"5m"`, `"2h"`, `"1d"`, `"1w"`.
///
/// Results of 1 to 4 seconds are rejected ([`MIN_TTL_SECS`]), as is anything
/// above [`MAX_TTL_SECS`].
pub fn parse_ttl_seconds(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::invalid_duration(input, "empty duration string"));
    }
    if input == "0" {
        return Ok(0);
    }

    let lower = input.to_ascii_lowercase();
    let Some(magnitude_str) = lower
        .strip_suffix(|c: char| c.is_ascii_alphabetic())
        .filter(|m| !m.is_empty())
    else {
        return Err(Error::invalid_duration(
            input,
            "missing unit suffix (s/m/h/d/w)",
        ));
    };

    let magnitude: u64 = magnitude_str.parse().map_err(|_| {
        Error::invalid_duration(input, "magnitude must be a non-negative integer")
    })?;

    // lower is non-empty here, last byte is the suffix.
    let unit_seconds = match &lower[lower.len() - 1..] {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        other => {
            return Err(Error::invalid_duration(
                input,
                format!("unknown unit suffix {other:?} (expected s/m/h/d/w)"),
            ));
        },
    };

    let seconds = magnitude
        .checked_mul(unit_seconds)
        .filter(|&s| s <= MAX_TTL_SECS)
        .ok_or_else(|| Error::invalid_duration(input, "duration exceeds the 10 year maximum"))?;

    if seconds != 0 && seconds < MIN_TTL_SECS {
        return Err(Error::BelowMinimum { seconds });
    }
    Ok(seconds)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("5s", 5)]
    #[case("30s", 30)]
    #[case("1m", 60)]
    #[case("5m", 300)]
    #[case("2h", 7_200)]
    #[case("1d", 86_400)]
    #[case("1w", 604_800)]
    #[case("10W", 6_048_000)]
    fn test_parse_units(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_ttl_seconds(input).unwrap(), expected);
    }

    #[test]
    fn test_zero_disables() {
        assert_eq!(parse_ttl_seconds("0").unwrap(), 0);
    }

    #[test]
    fn test_zero_with_suffix_disables() {
        // "0s" normalizes to 0 like bare "0".
        assert_eq!(parse_ttl_seconds("0s").unwrap(), 0);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parse_ttl_seconds("  10m  ").unwrap(), 600);
    }

    #[rstest]
    #[case("1s")]
    #[case("2s")]
    #[case("3s")]
    #[case("4s")]
    fn test_below_minimum_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_ttl_seconds(input),
            Err(Error::BelowMinimum { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("100")]
    #[case("10x")]
    #[case("s")]
    #[case("-5s")]
    #[case("1.5h")]
    #[case("5 m")]
    fn test_invalid_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_ttl_seconds(input),
            Err(Error::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_max_cap() {
        // 521 weeks is just under 10 years, 522 goes over.
        assert!(parse_ttl_seconds("521w").is_ok());
        assert!(parse_ttl_seconds("522w").is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(parse_ttl_seconds("18446744073709551615w").is_err());
        assert!(parse_ttl_seconds("99999999999999999999s").is_err());
    }
}
