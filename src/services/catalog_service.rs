use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::db::repositories::service_repository::{ServiceRepository, ServiceRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::service::{ServiceCreateInput, ServiceRecord, ServiceUpdateInput};

/// The catalog of bookable services. Categories are free-text display
/// names; the UI supplies suggestions, the core does not.
#[derive(Clone)]
pub struct CatalogService {
    db: DbPool,
}

impl CatalogService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create(&self, input: ServiceCreateInput) -> AppResult<ServiceRecord> {
        let category = normalize_category(&input.category)?;
        let duration_minutes = normalize_non_negative("duration", input.duration_minutes)?;
        let base_price = normalize_non_negative("base price", input.base_price)?;

        let now = Utc::now().to_rfc3339();
        let record = ServiceRecord {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            duration_minutes,
            base_price,
            description: normalize_optional(input.description),
            created_at: now.clone(),
            updated_at: now,
        };

        let row = ServiceRow::from_record(&record);
        self.db
            .with_connection(|conn| ServiceRepository::insert(conn, &row))?;
        info!(service_id = %record.id, category = %record.category, "service created");
        Ok(record)
    }

    pub fn update(&self, id: &str, update: ServiceUpdateInput) -> AppResult<ServiceRecord> {
        let mut record = self.get(id)?;

        if let Some(category) = update.category {
            record.category = normalize_category(&category)?;
        }
        if let Some(duration) = update.duration_minutes {
            record.duration_minutes = normalize_non_negative("duration", Some(duration))?;
        }
        if let Some(base_price) = update.base_price {
            record.base_price = normalize_non_negative("base price", Some(base_price))?;
        }
        if let Some(description) = update.description {
            record.description = normalize_optional(description);
        }
        record.updated_at = Utc::now().to_rfc3339();

        let row = ServiceRow::from_record(&record);
        self.db
            .with_connection(|conn| ServiceRepository::update(conn, &row))?;
        info!(service_id = %record.id, "service updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| ServiceRepository::delete(conn, id))?;
        info!(service_id = %id, "service deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> AppResult<ServiceRecord> {
        let row = self
            .db
            .with_connection(|conn| ServiceRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)?;
        Ok(row.into_record())
    }

    pub fn list(&self) -> AppResult<Vec<ServiceRecord>> {
        let rows = self
            .db
            .with_connection(|conn| ServiceRepository::list_all(conn))?;
        let services: Vec<_> = rows.into_iter().map(|row| row.into_record()).collect();
        debug!(count = services.len(), "services listed");
        Ok(services)
    }
}

fn normalize_category(category: &str) -> AppResult<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("service category must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn normalize_non_negative(name: &str, value: Option<i64>) -> AppResult<i64> {
    let value = value.unwrap_or(0);
    if value < 0 {
        return Err(AppError::validation_with_details(
            format!("{name} must not be negative"),
            json!({ "value": value }),
        ));
    }
    Ok(value)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
