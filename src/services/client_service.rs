use chrono::Utc;
use tracing::{debug, info};

use crate::db::repositories::client_repository::{ClientRepository, ClientRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::client::{ClientCreateInput, ClientRecord, ClientUpdateInput};

#[derive(Clone)]
pub struct ClientService {
    db: DbPool,
}

impl ClientService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create(&self, input: ClientCreateInput) -> AppResult<ClientRecord> {
        let name = normalize_name(&input.name)?;
        let now = Utc::now().to_rfc3339();
        let record = ClientRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone: normalize_optional(input.phone),
            notes: normalize_optional(input.notes),
            created_at: now.clone(),
            updated_at: now,
        };

        let row = ClientRow::from_record(&record);
        self.db
            .with_connection(|conn| ClientRepository::insert(conn, &row))?;
        info!(client_id = %record.id, "client created");
        Ok(record)
    }

    pub fn update(&self, id: &str, update: ClientUpdateInput) -> AppResult<ClientRecord> {
        let mut record = self.get(id)?;

        if let Some(name) = update.name {
            record.name = normalize_name(&name)?;
        }
        if let Some(phone) = update.phone {
            record.phone = normalize_optional(phone);
        }
        if let Some(notes) = update.notes {
            record.notes = normalize_optional(notes);
        }
        record.updated_at = Utc::now().to_rfc3339();

        let row = ClientRow::from_record(&record);
        self.db
            .with_connection(|conn| ClientRepository::update(conn, &row))?;
        info!(client_id = %record.id, "client updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| ClientRepository::delete(conn, id))?;
        info!(client_id = %id, "client deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> AppResult<ClientRecord> {
        let row = self
            .db
            .with_connection(|conn| ClientRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        Ok(row.into_record())
    }

    pub fn list(&self) -> AppResult<Vec<ClientRecord>> {
        let rows = self
            .db
            .with_connection(|conn| ClientRepository::list_all(conn))?;
        let clients: Vec<_> = rows.into_iter().map(|row| row.into_record()).collect();
        debug!(count = clients.len(), "clients listed");
        Ok(clients)
    }
}

fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("client name must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
