//! Time-tracking arithmetic shared by the timer stop path and manual entry.
//!
//! Durations are recorded in whole minutes; the project ledger is kept in
//! fractional hours. A project's hour balance has no floor: overspent work
//! drives it negative and the back office shows it in red.

use chrono::{DateTime, Utc};

/// Elapsed wall-clock time between `start` and `end`, rounded up to whole
/// minutes. Any started minute counts; a negative interval clamps to zero.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 59_999) / 60_000
}

/// Remaining hour balance after logging `minutes` of work.
pub fn debit_hours(balance: f64, minutes: i64) -> f64 {
    balance - minutes as f64 / 60.0
}

/// Upper bound for a single log entry, one year of minutes. Keeps the
/// stored i32 minute column and the ledger debit in agreement: a manual
/// count past this (or past i32) is rejected instead of wrapping.
pub const MAX_LOG_MINUTES: i64 = 525_600;

/// Validate a user-supplied minute count, narrowing it to the column type.
pub fn validate_log_minutes(minutes: i64) -> Result<i32, &'static str> {
    if minutes < 0 {
        return Err("Duration must be zero or more minutes");
    }
    if minutes > MAX_LOG_MINUTES {
        return Err("Duration is too large for a single log entry");
    }
    Ok(minutes as i32)
}

/// A log commits only with a description of the work. Whitespace does not
/// count; the caller keeps the timer running when this fails.
pub fn validate_log_description(raw: &str) -> Result<&str, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("A description of the work is required");
    }
    Ok(trimmed)
}
