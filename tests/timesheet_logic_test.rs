use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use vertex_portal_api::services::timesheet::{
    debit_hours, duration_minutes, validate_log_description, validate_log_minutes,
    MAX_LOG_MINUTES,
};

#[test]
fn full_hour_debits_one_hour() {
    assert_eq!(debit_hours(10.0, 60), 9.0);
}

#[test]
fn thirty_minutes_debits_half_hour() {
    assert_eq!(debit_hours(10.0, 30), 9.5);
}

#[test]
fn zero_minutes_leaves_balance_unchanged() {
    assert_eq!(debit_hours(7.25, 0), 7.25);
}

#[test]
fn balance_may_go_negative() {
    assert_eq!(debit_hours(0.5, 60), -0.5);
}

#[test]
fn exact_minutes_are_not_rounded_up() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let end = start + Duration::minutes(25);
    assert_eq!(duration_minutes(start, end), 25);
}

#[test]
fn partial_minute_rounds_up() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let end = start + Duration::seconds(61);
    assert_eq!(duration_minutes(start, end), 2);
}

#[test]
fn one_second_counts_as_a_minute() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let end = start + Duration::seconds(1);
    assert_eq!(duration_minutes(start, end), 1);
}

#[test]
fn zero_elapsed_is_zero_minutes() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    assert_eq!(duration_minutes(start, start), 0);
}

#[test]
fn clock_going_backwards_clamps_to_zero() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let end = start - Duration::minutes(5);
    assert_eq!(duration_minutes(start, end), 0);
}

#[test]
fn manual_minutes_within_cap_pass_through() {
    assert_eq!(validate_log_minutes(0), Ok(0));
    assert_eq!(validate_log_minutes(60), Ok(60));
    assert_eq!(validate_log_minutes(MAX_LOG_MINUTES), Ok(MAX_LOG_MINUTES as i32));
}

#[test]
fn negative_manual_minutes_are_rejected() {
    assert!(validate_log_minutes(-1).is_err());
}

#[test]
fn manual_minutes_above_the_cap_are_rejected() {
    assert!(validate_log_minutes(MAX_LOG_MINUTES + 1).is_err());
}

#[test]
fn manual_minutes_past_i32_never_wrap() {
    // A count that would flip sign when narrowed to the stored column type
    // must be refused outright, so the log row and the ledger debit can
    // never diverge on one request.
    assert!(validate_log_minutes(i64::from(i32::MAX) + 1).is_err());
    assert!(validate_log_minutes(i64::MAX).is_err());
}

#[test]
fn empty_description_is_rejected() {
    assert!(validate_log_description("").is_err());
}

#[test]
fn whitespace_only_description_is_rejected() {
    assert!(validate_log_description("   \t\n").is_err());
}

#[test]
fn description_is_trimmed_on_acceptance() {
    assert_eq!(validate_log_description("  fixed the header  "), Ok("fixed the header"));
}

#[test]
fn timer_and_debit_compose() {
    // 90 minutes of tracked work against a 10 hour balance.
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
    let end = start + Duration::minutes(90);
    let minutes = duration_minutes(start, end);
    assert_eq!(debit_hours(10.0, minutes), 8.5);
}
