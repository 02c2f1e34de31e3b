use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::db::repositories::appointment_repository::{AppointmentRepository, AppointmentRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::appointment::{AppointmentRecord, VALID_STATUSES};
use crate::services::schedule_utils::{format_datetime_utc, parse_datetime};

/// Storage-facing appointment operations. Creation and rescheduling go
/// through the booking engine; this service covers lookups, status changes
/// and deletion.
#[derive(Clone)]
pub struct AppointmentService {
    db: DbPool,
}

impl AppointmentService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn get(&self, id: &str) -> AppResult<AppointmentRecord> {
        let row = self
            .db
            .with_connection(|conn| AppointmentRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        let record = row.into_record();
        debug!(appointment_id = %record.id, "appointment fetched");
        Ok(record)
    }

    pub fn list(&self) -> AppResult<Vec<AppointmentRecord>> {
        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_all(conn))?;
        let appointments: Vec<_> = rows.into_iter().map(|row| row.into_record()).collect();
        debug!(count = appointments.len(), "appointments listed");
        Ok(appointments)
    }

    pub fn list_by_status(&self, status: &str) -> AppResult<Vec<AppointmentRecord>> {
        let status = normalize_status(status)?;
        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_by_status(conn, &status))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    pub fn list_in_range(&self, from: &str, to: &str) -> AppResult<Vec<AppointmentRecord>> {
        // Stored timestamps are UTC-normalized; the bounds must match for
        // the column comparison to be chronological.
        let from = format_datetime_utc(parse_datetime(from)?);
        let to = format_datetime_utc(parse_datetime(to)?);
        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_in_range(conn, &from, &to))?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }

    pub fn set_status(&self, id: &str, status: &str) -> AppResult<AppointmentRecord> {
        let status = normalize_status(status)?;
        let mut record = self.get(id)?;
        record.status = status;
        record.updated_at = Utc::now().to_rfc3339();

        let row = AppointmentRow::from_record(&record);
        self.db
            .with_connection(|conn| AppointmentRepository::update(conn, &row))?;
        info!(appointment_id = %record.id, status = %record.status, "appointment status changed");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| AppointmentRepository::delete(conn, id))?;
        info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }
}

fn normalize_status(status: &str) -> AppResult<String> {
    let normalized = status.trim().to_lowercase();
    if !VALID_STATUSES.contains(&normalized.as_str()) {
        return Err(AppError::validation_with_details(
            "unknown appointment status",
            json!({ "status": status, "valid": VALID_STATUSES }),
        ));
    }
    Ok(normalized)
}
