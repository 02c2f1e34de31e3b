use once_cell::sync::OnceCell;
use tauri::Manager;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

// Dropping the guard would lose buffered log lines, so it lives for the
// whole process.
static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const LOG_FILE: &str = "studiobook.log";
const DEFAULT_DIRECTIVES: &str = "info,app::booking=debug,app::schedule=debug,app::db=info";

/// Compact console output plus a daily-rolled file under `<app-data>/logs`.
/// Only the first call installs the subscriber; later calls are no-ops.
pub fn init_logging(app: &tauri::AppHandle) -> AppResult<()> {
    if FILE_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app
        .path()
        .app_data_dir()
        .map_err(|err| AppError::other(format!("failed to resolve app data dir: {err}")))?
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE));
    if FILE_GUARD.set(guard).is_err() {
        // Another thread finished initialization first.
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .map_err(|err| AppError::other(format!("failed to parse log directives: {err}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_timer(UtcTime::rfc_3339()),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339()),
        )
        .init();

    Ok(())
}
