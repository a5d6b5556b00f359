use jira_worklog::error::DurationError;
use jira_worklog::worklog::{
    DurationUnit, WorkDuration, format_duration, parse_duration, validate_duration,
};

#[test]
fn test_parse_documented_examples() {
    assert_eq!(parse_duration("30m"), Some(1800));
    assert_eq!(parse_duration("2h"), Some(7200));
    assert_eq!(parse_duration("1d"), Some(28800));
    assert_eq!(parse_duration("1w"), Some(144000));
    assert_eq!(parse_duration("2h 30m"), Some(9000));
    assert_eq!(parse_duration("1d 4h 30m"), Some(44400));
}

#[test]
fn test_parse_failures() {
    assert_eq!(parse_duration(""), None);
    assert_eq!(parse_duration("   "), None);
    assert_eq!(parse_duration("xyz"), None);
    // Seconds are not a supported unit
    assert_eq!(parse_duration("45s"), None);
}

#[test]
fn test_parse_is_order_independent() {
    assert_eq!(parse_duration("30m 1d 4h"), parse_duration("1d 4h 30m"));
    assert_eq!(parse_duration("1h 1h"), Some(7200));
}

#[test]
fn test_parse_tokens_without_separators() {
    assert_eq!(parse_duration("1d4h30m"), Some(44400));
}

#[test]
fn test_working_time_convention() {
    assert_eq!(DurationUnit::Day.seconds(), 8 * DurationUnit::Hour.seconds());
    assert_eq!(DurationUnit::Week.seconds(), 5 * DurationUnit::Day.seconds());
    assert_eq!(parse_duration("5d"), parse_duration("1w"));
    assert_eq!(parse_duration("8h"), parse_duration("1d"));
}

#[test]
fn test_format_documented_examples() {
    assert_eq!(format_duration(0), "0m");
    assert_eq!(format_duration(-5), "0m");
    assert_eq!(format_duration(9000), "2h 30m");
    assert_eq!(format_duration(144000), "1w");
}

#[test]
fn test_format_is_not_inverse_for_non_canonical_strings() {
    let secs = parse_duration("90m").unwrap();
    assert_eq!(format_duration(secs as i64), "1h 30m");

    let secs = parse_duration("1h 30s 1m").unwrap();
    assert_eq!(format_duration(secs as i64), "1h 1m");
}

#[test]
fn test_round_trip_canonical_values() {
    let samples = [
        60_i64,
        1800,
        3600,
        9000,
        28800,
        44400,
        144000,
        144000 * 3 + 28800 * 4 + 3600 * 7 + 59 * 60,
    ];
    for secs in samples {
        assert_eq!(parse_duration(&format_duration(secs)), Some(secs as u64));
    }
}

#[test]
fn test_validate_error_messages() {
    let missing = validate_duration(Some("")).unwrap_err();
    assert!(missing.to_string().contains("required"));

    let invalid = validate_duration(Some("abc")).unwrap_err();
    assert_eq!(invalid, DurationError::NoRecognizedUnits);
    for example in [r#""2h""#, r#""30m""#, r#""2h 30m""#, r#""1d 4h""#] {
        assert!(invalid.to_string().contains(example));
    }

    let zero = validate_duration(Some("0m")).unwrap_err();
    assert!(zero.to_string().contains("greater than 0"));

    assert_eq!(
        validate_duration(Some(" \t ")),
        Err(DurationError::EmptyInput)
    );
}

#[test]
fn test_validate_accepts_positive_duration() {
    assert_eq!(validate_duration(Some("2h 30m")), Ok(9000));
}

#[test]
fn test_lenient_scan_accepts_surrounding_text() {
    assert_eq!(validate_duration(Some("garbage 2h more garbage")), Ok(7200));
}

#[test]
fn test_work_duration_parses_like_validate() {
    assert_eq!("0m".parse::<WorkDuration>(), Err(DurationError::ZeroDuration));
    assert_eq!(
        "1w 1d".parse::<WorkDuration>().map(|d| d.as_secs()),
        Ok(172800)
    );
}

#[test]
fn test_concurrent_callers_agree() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                (
                    parse_duration("1d 4h 30m"),
                    format_duration(44400),
                    validate_duration(Some("0m")),
                )
            })
        })
        .collect();

    for handle in handles {
        let (parsed, formatted, validated) = handle.join().unwrap();
        assert_eq!(parsed, Some(44400));
        assert_eq!(formatted, "1d 4h 30m");
        assert_eq!(validated, Err(DurationError::ZeroDuration));
    }
}
