pub mod appointment;
pub mod backup;
pub mod booking;
pub mod catalog;
pub mod client;
pub mod schedule;
pub mod settings;
pub mod stats;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tauri::async_runtime;
use tracing::error;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::appointment_service::AppointmentService;
use crate::services::availability_service::AvailabilityService;
use crate::services::backup_service::BackupService;
use crate::services::booking_service::BookingService;
use crate::services::catalog_service::CatalogService;
use crate::services::client_service::ClientService;
use crate::services::settings_service::SettingsService;
use crate::services::stats_service::StatsService;

#[derive(Clone)]
pub struct AppState {
    settings_service: Arc<SettingsService>,
    booking_service: Arc<BookingService>,
    appointment_service: Arc<AppointmentService>,
    availability_service: Arc<AvailabilityService>,
    client_service: Arc<ClientService>,
    catalog_service: Arc<CatalogService>,
    stats_service: Arc<StatsService>,
    backup_service: Arc<BackupService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> AppResult<Self> {
        let settings_service = Arc::new(SettingsService::new(db_pool.clone()));
        let booking_service = Arc::new(BookingService::new(
            db_pool.clone(),
            Arc::clone(&settings_service),
        ));
        let appointment_service = Arc::new(AppointmentService::new(db_pool.clone()));
        let availability_service = Arc::new(AvailabilityService::new(db_pool.clone()));
        let client_service = Arc::new(ClientService::new(db_pool.clone()));
        let catalog_service = Arc::new(CatalogService::new(db_pool.clone()));
        let stats_service = Arc::new(StatsService::new(db_pool.clone()));
        let backup_service = Arc::new(BackupService::new(db_pool));

        Ok(Self {
            settings_service,
            booking_service,
            appointment_service,
            availability_service,
            client_service,
            catalog_service,
            stats_service,
            backup_service,
        })
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn booking(&self) -> Arc<BookingService> {
        Arc::clone(&self.booking_service)
    }

    pub fn appointments(&self) -> Arc<AppointmentService> {
        Arc::clone(&self.appointment_service)
    }

    pub fn availability(&self) -> Arc<AvailabilityService> {
        Arc::clone(&self.availability_service)
    }

    pub fn clients(&self) -> Arc<ClientService> {
        Arc::clone(&self.client_service)
    }

    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog_service)
    }

    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats_service)
    }

    pub fn backup(&self) -> Arc<BackupService> {
        Arc::clone(&self.backup_service)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested record does not exist", None)
            }
            AppError::Conflict { message, details } => {
                CommandError::new("CONFLICT", message, details)
            }
            AppError::NoSlotAvailable => CommandError::new(
                "NO_SLOT_AVAILABLE",
                "no free slot within the search horizon",
                None,
            ),
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "filesystem read/write failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    async_runtime::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("task execution failed: {err}"), None))?
        .map_err(CommandError::from)
}
