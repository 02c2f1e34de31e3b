use chrono::{DateTime, Duration, FixedOffset};
use tracing::{debug, warn};

use crate::db::repositories::appointment_repository::AppointmentRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::appointment::AppointmentRecord;
use crate::models::schedule::TimeSlot;
use crate::models::settings::ScheduleSettings;
use crate::services::schedule_utils::{
    add_minutes, at_minute_of_day, ceil_to_minute, format_datetime, minutes_from_midnight,
    overlaps, parse_datetime, round_up_to_slot,
};

/// Parsed `[start, end)` interval of a stored appointment. A stored duration
/// of zero or less yields a zero-width interval, which overlaps nothing;
/// a duration too large to represent is skipped like an unparseable start.
fn appointment_interval(
    appointment: &AppointmentRecord,
) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let start = match parse_datetime(&appointment.start_at) {
        Ok(value) => value,
        Err(_) => {
            warn!(
                target: "app::schedule",
                appointment_id = %appointment.id,
                start_at = %appointment.start_at,
                "skipping appointment with unparseable start"
            );
            return None;
        }
    };
    let width = appointment.duration_minutes.max(0);
    let end = Duration::try_minutes(width).and_then(|span| start.checked_add_signed(span));
    let Some(end) = end else {
        warn!(
            target: "app::schedule",
            appointment_id = %appointment.id,
            duration_minutes = appointment.duration_minutes,
            "skipping appointment with out-of-range duration"
        );
        return None;
    };
    Some((start, end))
}

/// Every non-canceled appointment in `snapshot` whose interval overlaps the
/// candidate interval, skipping `exclude_id` (used when editing in place).
/// Pure read over the snapshot.
pub fn find_conflicts(
    snapshot: &[AppointmentRecord],
    candidate_start: DateTime<FixedOffset>,
    candidate_end: DateTime<FixedOffset>,
    exclude_id: Option<&str>,
) -> Vec<AppointmentRecord> {
    snapshot
        .iter()
        .filter(|appointment| !appointment.is_canceled())
        .filter(|appointment| exclude_id != Some(appointment.id.as_str()))
        .filter_map(|appointment| {
            let (start, end) = appointment_interval(appointment)?;
            overlaps(candidate_start, candidate_end, start, end).then(|| appointment.clone())
        })
        .collect()
}

/// The non-canceled appointment ending exactly at `candidate_start`, if any.
/// Feeds the preparation-buffer offer.
pub fn find_preceding_adjacent(
    snapshot: &[AppointmentRecord],
    candidate_start: DateTime<FixedOffset>,
    exclude_id: Option<&str>,
) -> Option<AppointmentRecord> {
    snapshot
        .iter()
        .filter(|appointment| !appointment.is_canceled())
        .filter(|appointment| exclude_id != Some(appointment.id.as_str()))
        .filter(|appointment| appointment.duration_minutes > 0)
        .find_map(|appointment| {
            let (_, end) = appointment_interval(appointment)?;
            (end == candidate_start).then(|| appointment.clone())
        })
}

/// Contiguous slots covering the business-day window of the day `day_ref`
/// falls on, in the offset of `day_ref`. A final slot that would extend past
/// the window end is dropped. Each slot is annotated with the first
/// overlapping appointment, if any.
pub fn day_slots(
    snapshot: &[AppointmentRecord],
    day_ref: DateTime<FixedOffset>,
    settings: &ScheduleSettings,
) -> AppResult<Vec<TimeSlot>> {
    let day = day_ref.date_naive();
    let offset = *day_ref.offset();

    let mut slots = Vec::new();
    let mut minute = settings.workday_start_minute;
    while minute + settings.slot_minutes <= settings.workday_end_minute {
        let start = at_minute_of_day(day, minute, offset)?;
        let end = add_minutes(start, settings.slot_minutes)?;
        let occupying = snapshot
            .iter()
            .filter(|appointment| !appointment.is_canceled())
            .find(|appointment| match appointment_interval(appointment) {
                Some((a_start, a_end)) => overlaps(start, end, a_start, a_end),
                None => false,
            });

        slots.push(TimeSlot {
            start_at: format_datetime(start),
            end_at: format_datetime(end),
            is_booked: occupying.is_some(),
            appointment_id: occupying.map(|appointment| appointment.id.clone()),
        });
        minute += settings.slot_minutes;
    }

    Ok(slots)
}

/// Earliest conflict-free slot of `duration_minutes`, scanning forward from
/// `search_from` on slot-granularity boundaries. Rolls over to the next
/// day's window start when the remaining window cannot fit the duration and
/// gives up after `search_horizon_days` days.
pub fn find_next_available_slot(
    snapshot: &[AppointmentRecord],
    settings: &ScheduleSettings,
    duration_minutes: i64,
    search_from: DateTime<FixedOffset>,
    exclude_id: Option<&str>,
) -> AppResult<Option<TimeSlot>> {
    if duration_minutes <= 0 {
        return Err(AppError::validation("duration must be positive"));
    }

    let search_from = ceil_to_minute(search_from)?;
    let offset = *search_from.offset();
    let mut day = search_from.date_naive();

    for day_index in 0..settings.search_horizon_days.max(1) {
        let mut minute = if day_index == 0 {
            round_up_to_slot(
                minutes_from_midnight(search_from),
                settings.workday_start_minute,
                settings.slot_minutes,
            )
        } else {
            settings.workday_start_minute
        };
        if minute < settings.workday_start_minute {
            minute = settings.workday_start_minute;
        }

        while minute + duration_minutes <= settings.workday_end_minute {
            let start = at_minute_of_day(day, minute, offset)?;
            let end = add_minutes(start, duration_minutes)?;
            if find_conflicts(snapshot, start, end, exclude_id).is_empty() {
                debug!(
                    target: "app::schedule",
                    start = %start,
                    day_index,
                    "found free slot"
                );
                return Ok(Some(TimeSlot {
                    start_at: format_datetime(start),
                    end_at: format_datetime(end),
                    is_booked: false,
                    appointment_id: None,
                }));
            }
            minute += settings.slot_minutes;
        }

        day = day
            .succ_opt()
            .ok_or_else(|| AppError::validation("date out of range"))?;
    }

    debug!(
        target: "app::schedule",
        horizon_days = settings.search_horizon_days,
        "no free slot within the search horizon"
    );
    Ok(None)
}

/// Db-backed facade over the pure availability functions. Fetches an
/// in-memory snapshot and delegates; nothing here writes.
#[derive(Clone)]
pub struct AvailabilityService {
    db: DbPool,
}

impl AvailabilityService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn snapshot(&self) -> AppResult<Vec<AppointmentRecord>> {
        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_all(conn))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    pub fn day_slots(
        &self,
        day_ref: &str,
        settings: &ScheduleSettings,
    ) -> AppResult<Vec<TimeSlot>> {
        let day_ref = parse_datetime(day_ref)?;
        let snapshot = self.snapshot()?;
        day_slots(&snapshot, day_ref, settings)
    }

    pub fn next_available_slot(
        &self,
        duration_minutes: i64,
        search_from: &str,
        settings: &ScheduleSettings,
    ) -> AppResult<Option<TimeSlot>> {
        let search_from = parse_datetime(search_from)?;
        let snapshot = self.snapshot()?;
        find_next_available_slot(&snapshot, settings, duration_minutes, search_from, None)
    }
}
