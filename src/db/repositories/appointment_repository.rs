use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::appointment::AppointmentRecord;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        client_id,
        service_id,
        start_at,
        duration_minutes,
        price,
        status,
        notes,
        created_at,
        updated_at
    FROM appointments
"#;

#[derive(Debug, Clone)]
pub struct AppointmentRow {
    pub id: String,
    pub client_id: String,
    pub service_id: String,
    pub start_at: String,
    pub duration_minutes: i64,
    pub price: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AppointmentRow {
    pub fn from_record(record: &AppointmentRecord) -> Self {
        Self {
            id: record.id.clone(),
            client_id: record.client_id.clone(),
            service_id: record.service_id.clone(),
            start_at: record.start_at.clone(),
            duration_minutes: record.duration_minutes,
            price: record.price,
            status: record.status.clone(),
            notes: record.notes.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        }
    }

    pub fn into_record(self) -> AppointmentRecord {
        AppointmentRecord {
            id: self.id,
            client_id: self.client_id,
            service_id: self.service_id,
            start_at: self.start_at,
            duration_minutes: self.duration_minutes,
            price: self.price,
            status: self.status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for AppointmentRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(AppointmentRow {
            id: row.get("id")?,
            client_id: row.get("client_id")?,
            service_id: row.get("service_id")?,
            start_at: row.get("start_at")?,
            duration_minutes: row.get("duration_minutes")?,
            price: row.get("price")?,
            status: row.get("status")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct AppointmentRepository;

impl AppointmentRepository {
    pub fn insert(conn: &Connection, row: &AppointmentRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO appointments (
                    id,
                    client_id,
                    service_id,
                    start_at,
                    duration_minutes,
                    price,
                    status,
                    notes,
                    created_at,
                    updated_at
                ) VALUES (
                    :id,
                    :client_id,
                    :service_id,
                    :start_at,
                    :duration_minutes,
                    :price,
                    :status,
                    :notes,
                    :created_at,
                    :updated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":client_id": &row.client_id,
                ":service_id": &row.service_id,
                ":start_at": &row.start_at,
                ":duration_minutes": &row.duration_minutes,
                ":price": &row.price,
                ":status": &row.status,
                ":notes": &row.notes,
                ":created_at": &row.created_at,
                ":updated_at": &row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn update(conn: &Connection, row: &AppointmentRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE appointments SET
                    client_id = :client_id,
                    service_id = :service_id,
                    start_at = :start_at,
                    duration_minutes = :duration_minutes,
                    price = :price,
                    status = :status,
                    notes = :notes,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":client_id": &row.client_id,
                ":service_id": &row.service_id,
                ":start_at": &row.start_at,
                ":duration_minutes": &row.duration_minutes,
                ":price": &row.price,
                ":status": &row.status,
                ":notes": &row.notes,
                ":updated_at": &row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM appointments WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<AppointmentRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| AppointmentRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<AppointmentRow>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY start_at ASC", BASE_SELECT))?;
        let rows = stmt
            .query_map([], |row| AppointmentRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_by_status(conn: &Connection, status: &str) -> AppResult<Vec<AppointmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE status = ?1 ORDER BY start_at ASC",
            BASE_SELECT
        ))?;
        let rows = stmt
            .query_map([status], |row| AppointmentRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Appointments whose stored start falls in `[from, to)`. RFC3339 strings
    /// with a fixed offset compare lexicographically in chronological order.
    pub fn list_in_range(conn: &Connection, from: &str, to: &str) -> AppResult<Vec<AppointmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE start_at >= :from AND start_at < :to ORDER BY start_at ASC",
            BASE_SELECT
        ))?;
        let rows = stmt
            .query_map(named_params! {":from": from, ":to": to}, |row| {
                AppointmentRow::try_from(row)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
