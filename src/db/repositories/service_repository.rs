use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::service::ServiceRecord;

const BASE_SELECT: &str = r#"
    SELECT id, category, duration_minutes, base_price, description, created_at, updated_at
    FROM services
"#;

#[derive(Debug, Clone)]
pub struct ServiceRow {
    pub id: String,
    pub category: String,
    pub duration_minutes: i64,
    pub base_price: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceRow {
    pub fn from_record(record: &ServiceRecord) -> Self {
        Self {
            id: record.id.clone(),
            category: record.category.clone(),
            duration_minutes: record.duration_minutes,
            base_price: record.base_price,
            description: record.description.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        }
    }

    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            category: self.category,
            duration_minutes: self.duration_minutes,
            base_price: self.base_price,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for ServiceRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(ServiceRow {
            id: row.get("id")?,
            category: row.get("category")?,
            duration_minutes: row.get("duration_minutes")?,
            base_price: row.get("base_price")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct ServiceRepository;

impl ServiceRepository {
    pub fn insert(conn: &Connection, row: &ServiceRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO services (
                    id, category, duration_minutes, base_price, description, created_at, updated_at
                ) VALUES (
                    :id, :category, :duration_minutes, :base_price, :description, :created_at, :updated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":category": &row.category,
                ":duration_minutes": &row.duration_minutes,
                ":base_price": &row.base_price,
                ":description": &row.description,
                ":created_at": &row.created_at,
                ":updated_at": &row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn update(conn: &Connection, row: &ServiceRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE services SET
                    category = :category,
                    duration_minutes = :duration_minutes,
                    base_price = :base_price,
                    description = :description,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":category": &row.category,
                ":duration_minutes": &row.duration_minutes,
                ":base_price": &row.base_price,
                ":description": &row.description,
                ":updated_at": &row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM services WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<ServiceRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| ServiceRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<ServiceRow>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY category ASC", BASE_SELECT))?;
        let rows = stmt
            .query_map([], |row| ServiceRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
