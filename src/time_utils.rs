// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for epoch-millisecond timestamps.

use chrono::Utc;

/// One day in milliseconds.
pub const DAY_MILLIS: i64 = 86_400 * 1000;

/// Length of a free trial.
pub const TRIAL_DAYS: i64 = 30;

/// Current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// End of a billing period starting at `now`.
///
/// Monthly plans run exactly 30 days and yearly plans exactly 365 days.
pub fn period_end_millis(now: i64, yearly: bool) -> i64 {
    let days = if yearly { 365 } else { 30 };
    now + days * DAY_MILLIS
}

/// Whole days left until `end`, rounded up. Zero once `end` has passed.
pub fn days_remaining(now: i64, end: i64) -> i64 {
    if end <= now {
        return 0;
    }
    (end - now + DAY_MILLIS - 1) / DAY_MILLIS
}
