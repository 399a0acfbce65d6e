//! Calendar-month arithmetic.
//!
//! Month addition is inherently ambiguous at month-end, so the rule is
//! fixed here in one place: the day-of-month is clamped to the last valid
//! day of the target month (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap
//! year), and the time-of-day is preserved.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Add `months` calendar months to `instant`, clamping at month-end.
///
/// Total over its domain for any month count that keeps the year within
/// chrono's supported range.
pub fn add_calendar_months(instant: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let date = instant.date_naive();
    let total_months = date.month0() + months;
    let year = date.year() + (total_months / 12) as i32;
    let month = total_months % 12 + 1;
    let day = date.day().min(days_in_month(year, month));

    let due_date = NaiveDate::from_ymd_opt(year, month, day)
        .expect("day is clamped to the target month's length");
    Utc.from_utc_datetime(&due_date.and_time(instant.time()))
}

/// Number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .expect("first day of a month always has a predecessor")
}
