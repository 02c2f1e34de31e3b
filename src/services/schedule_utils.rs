use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

pub fn parse_datetime(value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|err| {
        AppError::validation_with_details(
            "invalid datetime format",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn format_datetime(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339()
}

/// Normalized form for storage. Stored timestamps all carry the +00:00
/// offset, so lexicographic comparison on the column is chronological.
pub fn format_datetime_utc(dt: DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc).to_rfc3339()
}

pub fn add_minutes(dt: DateTime<FixedOffset>, minutes: i64) -> AppResult<DateTime<FixedOffset>> {
    let span = Duration::try_minutes(minutes).ok_or_else(|| {
        AppError::validation_with_details("minute span out of range", json!({ "minutes": minutes }))
    })?;
    dt.checked_add_signed(span)
        .ok_or_else(|| AppError::validation("datetime arithmetic out of range"))
}

/// Half-open interval overlap: touching endpoints do not overlap, and a
/// zero-width interval overlaps nothing.
pub fn overlaps(
    a_start: DateTime<FixedOffset>,
    a_end: DateTime<FixedOffset>,
    b_start: DateTime<FixedOffset>,
    b_end: DateTime<FixedOffset>,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn minutes_from_midnight(dt: DateTime<FixedOffset>) -> i64 {
    let time = dt.time();
    (time.hour() as i64) * 60 + (time.minute() as i64)
}

pub fn to_naive_time(total_minutes: i64) -> AppResult<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&total_minutes) {
        return Err(AppError::validation_with_details(
            "minute of day out of range",
            json!({"minute": total_minutes}),
        ));
    }
    NaiveTime::from_hms_opt((total_minutes / 60) as u32, (total_minutes % 60) as u32, 0)
        .ok_or_else(|| AppError::validation("minute of day out of range"))
}

/// Build a datetime on `day` at `minute_of_day`, keeping the given offset.
pub fn at_minute_of_day(
    day: NaiveDate,
    minute_of_day: i64,
    offset: FixedOffset,
) -> AppResult<DateTime<FixedOffset>> {
    let naive = day.and_time(to_naive_time(minute_of_day)?);
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| AppError::validation("datetime out of range"))
}

/// Drop sub-minute precision, rounding forward when anything would be lost.
pub fn ceil_to_minute(dt: DateTime<FixedOffset>) -> AppResult<DateTime<FixedOffset>> {
    if dt.second() == 0 && dt.nanosecond() == 0 {
        return Ok(dt);
    }
    let truncated = dt
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .ok_or_else(|| AppError::validation("datetime out of range"))?;
    add_minutes(truncated, 1)
}

/// Round `minute_of_day` forward to the next slot boundary. Boundaries are
/// anchored at the window start; anything before the window rounds to the
/// window start itself.
pub fn round_up_to_slot(minute_of_day: i64, window_start_minute: i64, slot_minutes: i64) -> i64 {
    let offset = minute_of_day - window_start_minute;
    if offset <= 0 {
        return window_start_minute;
    }
    let remainder = offset % slot_minutes;
    if remainder == 0 {
        minute_of_day
    } else {
        minute_of_day + slot_minutes - remainder
    }
}

/// Weekday counted from Monday: 0 = Monday .. 6 = Sunday.
pub fn weekday_from_monday(dt: DateTime<FixedOffset>) -> i64 {
    dt.weekday().num_days_from_monday() as i64
}
