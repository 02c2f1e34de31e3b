use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::db::repositories::appointment_repository::{AppointmentRepository, AppointmentRow};
use crate::db::repositories::client_repository::ClientRepository;
use crate::db::repositories::service_repository::ServiceRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::appointment::{AppointmentRecord, STATUS_PLANNED};
use crate::models::schedule::{BookingDraft, BookingStep};
use crate::models::settings::ScheduleSettings;
use crate::services::availability_service::{
    find_conflicts, find_next_available_slot, find_preceding_adjacent,
};
use crate::services::schedule_utils::{
    add_minutes, ceil_to_minute, format_datetime, format_datetime_utc, parse_datetime,
    weekday_from_monday,
};
use crate::services::settings_service::SettingsService;

/// One pass of the booking state machine over an in-memory snapshot:
/// validation, preparation-buffer offer, conflict check with alternative
/// proposal, weekend surcharge offer, finalization. Decision points surface
/// as [`BookingStep`] variants; the caller records each answer on the draft
/// and re-runs `advance`, which re-derives the whole pipeline
/// deterministically. Nothing here touches storage.
pub fn advance(
    draft: &BookingDraft,
    snapshot: &[AppointmentRecord],
    settings: &ScheduleSettings,
) -> AppResult<BookingStep> {
    validate_draft(draft)?;

    let exclude_id = draft.appointment_id.as_deref();
    let mut start = ceil_to_minute(parse_datetime(&draft.start_at)?)?;

    // PreparationCheck: an appointment ending exactly at the candidate start
    // earns an offer to shift forward by the preparation buffer.
    if let Some(preceding) = find_preceding_adjacent(snapshot, start, exclude_id) {
        match draft.accept_preparation {
            None => {
                let shifted = add_minutes(start, settings.preparation_minutes)?;
                debug!(
                    target: "app::booking",
                    preceding_id = %preceding.id,
                    "offering preparation buffer"
                );
                return Ok(BookingStep::NeedsPreparationChoice {
                    preceding_appointment_id: preceding.id,
                    shifted_start_at: format_datetime(shifted),
                    preparation_minutes: settings.preparation_minutes,
                });
            }
            Some(true) => {
                start = add_minutes(start, settings.preparation_minutes)?;
            }
            Some(false) => {}
        }
    }

    // ConflictCheck on the (possibly shifted) interval.
    let end = add_minutes(start, draft.duration_minutes)?;
    let conflicts = find_conflicts(snapshot, start, end, exclude_id);
    if !conflicts.is_empty() {
        let conflict_ids: Vec<String> = conflicts.iter().map(|a| a.id.clone()).collect();

        if draft.accept_alternative == Some(false) {
            return Err(AppError::conflict_with_details(
                "candidate interval overlaps existing appointments",
                json!({ "conflictingAppointmentIds": conflict_ids }),
            ));
        }

        let proposed = find_next_available_slot(
            snapshot,
            settings,
            draft.duration_minutes,
            start,
            exclude_id,
        )?
        .ok_or_else(AppError::no_slot_available)?;

        if draft.accept_alternative.is_none() {
            debug!(
                target: "app::booking",
                proposed_start = %proposed.start_at,
                conflicts = conflict_ids.len(),
                "offering alternative slot"
            );
            return Ok(BookingStep::NeedsAlternativeChoice {
                conflicting_appointment_ids: conflict_ids,
                proposed,
            });
        }

        // Accepted: the proposed slot is conflict-free by construction, so
        // the attempt proceeds straight to the surcharge check.
        start = parse_datetime(&proposed.start_at)?;
    }

    // SurchargeCheck on the effective start.
    let mut price = draft.price;
    if weekday_from_monday(start) == settings.surcharge_weekday {
        match draft.apply_surcharge {
            None => {
                return Ok(BookingStep::NeedsSurchargeChoice {
                    start_at: format_datetime(start),
                    surcharge_amount: settings.surcharge_amount,
                    adjusted_price: price + settings.surcharge_amount,
                });
            }
            Some(true) => price += settings.surcharge_amount,
            Some(false) => {}
        }
    }

    let now = Utc::now().to_rfc3339();
    let appointment = match exclude_id {
        // Edit: preserve id, status and creation time of the stored record.
        Some(id) => {
            let existing = snapshot
                .iter()
                .find(|appointment| appointment.id == id)
                .ok_or_else(AppError::not_found)?;
            AppointmentRecord {
                id: existing.id.clone(),
                client_id: draft.client_id.clone(),
                service_id: draft.service_id.clone(),
                start_at: format_datetime_utc(start),
                duration_minutes: draft.duration_minutes,
                price,
                status: existing.status.clone(),
                notes: draft.notes.clone(),
                created_at: existing.created_at.clone(),
                updated_at: now,
            }
        }
        None => AppointmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: draft.client_id.clone(),
            service_id: draft.service_id.clone(),
            start_at: format_datetime_utc(start),
            duration_minutes: draft.duration_minutes,
            price,
            status: STATUS_PLANNED.to_string(),
            notes: draft.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        },
    };

    Ok(BookingStep::Finalized { appointment })
}

fn validate_draft(draft: &BookingDraft) -> AppResult<()> {
    if draft.client_id.trim().is_empty() {
        return Err(AppError::validation("a client is required"));
    }
    if draft.service_id.trim().is_empty() {
        return Err(AppError::validation("a service is required"));
    }
    if draft.duration_minutes <= 0 {
        return Err(AppError::validation_with_details(
            "duration must be positive",
            json!({ "durationMinutes": draft.duration_minutes }),
        ));
    }
    if draft.price < 0 {
        return Err(AppError::validation_with_details(
            "price must not be negative",
            json!({ "price": draft.price }),
        ));
    }
    Ok(())
}

/// Db-backed wrapper around the pure engine. `review` answers "what does the
/// caller have to decide next"; `finalize` re-runs the pipeline against a
/// fresh snapshot inside the write path and persists only a finalized
/// outcome, so a stale review can never commit an overlapping appointment.
#[derive(Clone)]
pub struct BookingService {
    db: DbPool,
    settings: Arc<SettingsService>,
}

impl BookingService {
    pub fn new(db: DbPool, settings: Arc<SettingsService>) -> Self {
        Self { db, settings }
    }

    pub fn review(&self, draft: &BookingDraft) -> AppResult<BookingStep> {
        self.verify_references(draft)?;
        let snapshot = self.load_snapshot()?;
        let settings = self.settings.get()?;
        advance(draft, &snapshot, &settings)
    }

    pub fn finalize(&self, draft: &BookingDraft) -> AppResult<AppointmentRecord> {
        self.verify_references(draft)?;
        let snapshot = self.load_snapshot()?;
        let settings = self.settings.get()?;

        match advance(draft, &snapshot, &settings)? {
            BookingStep::Finalized { appointment } => {
                let row = AppointmentRow::from_record(&appointment);
                let is_edit = draft.appointment_id.is_some();
                self.db.with_connection(|conn| {
                    if is_edit {
                        AppointmentRepository::update(conn, &row)
                    } else {
                        AppointmentRepository::insert(conn, &row)
                    }
                })?;
                info!(
                    target: "app::booking",
                    appointment_id = %appointment.id,
                    start_at = %appointment.start_at,
                    edited = is_edit,
                    "appointment finalized"
                );
                Ok(appointment)
            }
            pending => Err(AppError::validation_with_details(
                "booking attempt still has pending decisions",
                serde_json::to_value(&pending)?,
            )),
        }
    }

    fn load_snapshot(&self) -> AppResult<Vec<AppointmentRecord>> {
        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_all(conn))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    fn verify_references(&self, draft: &BookingDraft) -> AppResult<()> {
        self.db.with_connection(|conn| {
            if !draft.client_id.trim().is_empty()
                && ClientRepository::find_by_id(conn, &draft.client_id)?.is_none()
            {
                return Err(AppError::not_found());
            }
            if !draft.service_id.trim().is_empty()
                && ServiceRepository::find_by_id(conn, &draft.service_id)?.is_none()
            {
                return Err(AppError::not_found());
            }
            Ok(())
        })
    }
}
