//! Work-duration parsing and formatting.
//!
//! Durations use working time: a day is 8 hours and a week is 5 days.
//! The canonical value is a whole number of seconds.

use crate::error::DurationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `<number><unit>` with optional whitespace between. ASCII digits only.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*([wdhm])").expect("valid token pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Week,
    Day,
    Hour,
    Minute,
}

impl DurationUnit {
    /// Largest unit first; the order `format_duration` emits.
    pub const ALL: [DurationUnit; 4] = [
        DurationUnit::Week,
        DurationUnit::Day,
        DurationUnit::Hour,
        DurationUnit::Minute,
    ];

    pub const fn seconds(self) -> u64 {
        match self {
            DurationUnit::Week => 5 * 8 * 60 * 60,
            DurationUnit::Day => 8 * 60 * 60,
            DurationUnit::Hour => 60 * 60,
            DurationUnit::Minute => 60,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            DurationUnit::Week => 'w',
            DurationUnit::Day => 'd',
            DurationUnit::Hour => 'h',
            DurationUnit::Minute => 'm',
        }
    }

    /// Lowercase letters only; callers normalize case first.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'w' => Some(DurationUnit::Week),
            'd' => Some(DurationUnit::Day),
            'h' => Some(DurationUnit::Hour),
            'm' => Some(DurationUnit::Minute),
            _ => None,
        }
    }
}

/// Parse a free-form duration such as `"1d 4h 30m"` into seconds.
///
/// Every `<number><unit>` token adds to the total, so `"1h 1h"` is two hours.
/// Text between tokens is ignored. Returns `None` when no token is found.
pub fn parse_duration(input: &str) -> Option<u64> {
    let normalized = input.trim().to_lowercase();

    let mut total = 0.0_f64;
    let mut matched = false;

    for caps in TOKEN_PATTERN.captures_iter(&normalized) {
        matched = true;

        let value: f64 = caps[1].parse().ok()?;
        if value.is_nan() || value < 0.0 {
            return None;
        }

        let unit = caps[2].chars().next().and_then(DurationUnit::from_letter)?;
        total += value * unit.seconds() as f64;
    }

    if !matched {
        return None;
    }

    let rounded = total.round();
    if !rounded.is_finite() || rounded >= u64::MAX as f64 {
        return None;
    }

    Some(rounded as u64)
}

/// Format seconds as `"1w 2d 3h 4m"`, dropping zero parts.
///
/// Anything below a minute is truncated. Zero and negative input give `"0m"`.
pub fn format_duration(secs: i64) -> String {
    if secs <= 0 {
        return "0m".to_string();
    }
    format_seconds(secs.unsigned_abs())
}

/// Unsigned form of [`format_duration`], covering the whole range
/// `parse_duration` can return.
pub fn format_seconds(secs: u64) -> String {
    let mut remaining = secs;
    let mut parts = Vec::new();

    for unit in DurationUnit::ALL {
        let count = remaining / unit.seconds();
        remaining %= unit.seconds();
        if count > 0 {
            parts.push(format!("{}{}", count, unit.letter()));
        }
    }

    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}

/// Check user input before it is sent anywhere.
///
/// `None` stands for a missing value. On success returns the parsed seconds,
/// which are always greater than zero.
pub fn validate_duration(input: Option<&str>) -> Result<u64, DurationError> {
    let input = match input {
        Some(s) if !s.is_empty() => s,
        _ => return Err(DurationError::Missing),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::EmptyInput);
    }

    let secs = parse_duration(trimmed).ok_or(DurationError::NoRecognizedUnits)?;
    if secs == 0 {
        return Err(DurationError::ZeroDuration);
    }

    Ok(secs)
}

/// A validated, strictly positive work duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct WorkDuration(u64);

impl WorkDuration {
    /// `None` for zero, which is never a valid amount of work.
    pub fn from_secs(secs: u64) -> Option<Self> {
        (secs > 0).then_some(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl FromStr for WorkDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_duration(Some(s)).map(WorkDuration)
    }
}

impl TryFrom<u64> for WorkDuration {
    type Error = DurationError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs).ok_or(DurationError::ZeroDuration)
    }
}

impl From<WorkDuration> for u64 {
    fn from(d: WorkDuration) -> Self {
        d.0
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_seconds(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_units() {
        assert_eq!(parse_duration("30m"), Some(1800));
        assert_eq!(parse_duration("2h"), Some(7200));
        assert_eq!(parse_duration("1d"), Some(28800));
        assert_eq!(parse_duration("1w"), Some(144000));
    }

    #[test]
    fn test_parse_combined() {
        assert_eq!(parse_duration("2h 30m"), Some(9000));
        assert_eq!(parse_duration("1d 4h 30m"), Some(44400));
        assert_eq!(parse_duration("1w2d"), Some(144000 + 2 * 28800));
    }

    #[test]
    fn test_parse_rejects_input_without_tokens() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("xyz"), None);
        assert_eq!(parse_duration("42"), None);
        assert_eq!(parse_duration("h"), None);
    }

    #[test]
    fn test_parse_duplicate_units_add_up() {
        assert_eq!(parse_duration("1h 1h"), Some(7200));
        assert_eq!(parse_duration("30m 1h 30m"), Some(7200));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(parse_duration("  2H 30M  "), Some(9000));
        assert_eq!(parse_duration("1D"), Some(28800));
    }

    #[test]
    fn test_parse_allows_space_between_number_and_unit() {
        assert_eq!(parse_duration("2 h  15 m"), Some(8100));
    }

    #[test]
    fn test_parse_skips_unmatched_text() {
        assert_eq!(parse_duration("garbage 2h more garbage"), Some(7200));
        assert_eq!(parse_duration("2h, then 15m."), Some(8100));
    }

    #[test]
    fn test_parse_decimals_round_to_whole_seconds() {
        assert_eq!(parse_duration("1.5h"), Some(5400));
        assert_eq!(parse_duration("0.5d"), Some(14400));
        // 0.01m = 0.6s
        assert_eq!(parse_duration("0.01m"), Some(1));
        // 0.005m = 0.3s
        assert_eq!(parse_duration("0.005m"), Some(0));
    }

    #[test]
    fn test_parse_zero_is_a_valid_parse() {
        assert_eq!(parse_duration("0m"), Some(0));
    }

    #[test]
    fn test_parse_overflow_is_rejected() {
        let huge = format!("{}w", "9".repeat(400));
        assert_eq!(parse_duration(&huge), None);
    }

    #[test]
    fn test_format_zero_and_negative() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(-5), "0m");
        assert_eq!(format_duration(i64::MIN), "0m");
    }

    #[test]
    fn test_format_examples() {
        assert_eq!(format_duration(9000), "2h 30m");
        assert_eq!(format_duration(144000), "1w");
        assert_eq!(format_duration(44400), "1d 4h 30m");
        assert_eq!(format_duration(144000 + 28800 + 60), "1w 1d 1m");
    }

    #[test]
    fn test_format_truncates_sub_minute_remainder() {
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(119), "1m");
        assert_eq!(format_duration(3600 + 59), "1h");
    }

    #[test]
    fn test_round_trip_for_whole_minutes() {
        for minutes in (0..20_000_i64).step_by(37) {
            let secs = minutes * 60;
            let formatted = format_duration(secs);
            assert_eq!(
                parse_duration(&formatted),
                Some(secs as u64),
                "round trip failed for {} ({})",
                secs,
                formatted
            );
        }
    }

    #[test]
    fn test_validate_messages() {
        assert_eq!(validate_duration(None), Err(DurationError::Missing));
        assert_eq!(validate_duration(Some("")), Err(DurationError::Missing));
        assert_eq!(
            validate_duration(Some("   ")),
            Err(DurationError::EmptyInput)
        );
        assert_eq!(
            validate_duration(Some("abc")),
            Err(DurationError::NoRecognizedUnits)
        );
        assert_eq!(
            validate_duration(Some("0m")),
            Err(DurationError::ZeroDuration)
        );
        assert_eq!(
            validate_duration(Some("0h 0m")),
            Err(DurationError::ZeroDuration)
        );
    }

    #[test]
    fn test_validate_accepts_positive() {
        assert_eq!(validate_duration(Some("2h 30m")), Ok(9000));
        assert_eq!(validate_duration(Some(" 1d ")), Ok(28800));
    }

    #[test]
    fn test_calls_are_repeatable() {
        for _ in 0..3 {
            assert_eq!(parse_duration("1d 4h"), Some(43200));
            assert_eq!(format_duration(43200), "1d 4h");
            assert_eq!(validate_duration(Some("abc")), Err(DurationError::NoRecognizedUnits));
        }
    }

    #[test]
    fn test_unit_table() {
        let secs: Vec<u64> = DurationUnit::ALL.iter().map(|u| u.seconds()).collect();
        assert_eq!(secs, vec![144000, 28800, 3600, 60]);
        for unit in DurationUnit::ALL {
            assert_eq!(DurationUnit::from_letter(unit.letter()), Some(unit));
        }
        assert_eq!(DurationUnit::from_letter('s'), None);
    }

    #[test]
    fn test_work_duration_from_str_and_display() {
        let d: WorkDuration = "1d 4h 30m".parse().unwrap();
        assert_eq!(d.as_secs(), 44400);
        assert_eq!(d.to_string(), "1d 4h 30m");

        let err = "nope".parse::<WorkDuration>().unwrap_err();
        assert_eq!(err, DurationError::NoRecognizedUnits);
    }

    #[test]
    fn test_work_duration_serializes_as_seconds() {
        let d = WorkDuration::from_secs(9000).unwrap();
        assert_eq!(serde_json::to_value(d).unwrap(), serde_json::json!(9000));
    }

    #[test]
    fn test_work_duration_from_secs_rejects_zero() {
        assert_eq!(WorkDuration::from_secs(0), None);
        assert_eq!(WorkDuration::from_secs(60).map(|d| d.as_secs()), Some(60));
        assert!(serde_json::from_value::<WorkDuration>(serde_json::json!(0)).is_err());
        assert_eq!(
            serde_json::from_value::<WorkDuration>(serde_json::json!(60)).ok(),
            WorkDuration::from_secs(60)
        );
    }

    #[test]
    fn test_totals_beyond_i64_format_exactly() {
        let secs = parse_duration("70000000000000w").unwrap();
        assert!(secs > i64::MAX as u64);
        assert_eq!(format_seconds(secs), "70000000000000w");

        let d: WorkDuration = "70000000000000w".parse().unwrap();
        assert_eq!(d.to_string(), "70000000000000w");

        assert_eq!(format_seconds(u64::MAX), "128102389400760w 3d 7h");
    }

    #[test]
    fn test_format_seconds_matches_format_duration() {
        for secs in [0_i64, 59, 60, 9000, 44400, 144000, i64::MAX] {
            assert_eq!(format_seconds(secs as u64), format_duration(secs));
        }
    }
}
