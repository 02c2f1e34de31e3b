use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::client::ClientRecord;

const BASE_SELECT: &str = r#"
    SELECT id, name, phone, notes, created_at, updated_at
    FROM clients
"#;

#[derive(Debug, Clone)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ClientRow {
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            phone: record.phone.clone(),
            notes: record.notes.clone(),
            created_at: record.created_at.clone(),
            updated_at: record.updated_at.clone(),
        }
    }

    pub fn into_record(self) -> ClientRecord {
        ClientRecord {
            id: self.id,
            name: self.name,
            phone: self.phone,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for ClientRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(ClientRow {
            id: row.get("id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct ClientRepository;

impl ClientRepository {
    pub fn insert(conn: &Connection, row: &ClientRow) -> AppResult<()> {
        conn.execute(
            r#"
                INSERT INTO clients (id, name, phone, notes, created_at, updated_at)
                VALUES (:id, :name, :phone, :notes, :created_at, :updated_at)
            "#,
            named_params! {
                ":id": &row.id,
                ":name": &row.name,
                ":phone": &row.phone,
                ":notes": &row.notes,
                ":created_at": &row.created_at,
                ":updated_at": &row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn update(conn: &Connection, row: &ClientRow) -> AppResult<()> {
        let affected = conn.execute(
            r#"
                UPDATE clients SET
                    name = :name,
                    phone = :phone,
                    notes = :notes,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":name": &row.name,
                ":phone": &row.phone,
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
        let affected = conn.execute("DELETE FROM clients WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<ClientRow>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| ClientRow::try_from(row))
            .optional()?;
        Ok(row)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<ClientRow>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY name ASC", BASE_SELECT))?;
        let rows = stmt
            .query_map([], |row| ClientRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
