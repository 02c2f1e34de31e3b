use tauri::State;

use crate::services::backup_service::BackupSummary;

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn backup_create(
    state: State<'_, AppState>,
    destination: String,
) -> CommandResult<BackupSummary> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.backup().backup_to(&destination)).await
}

#[tauri::command]
pub async fn backup_restore(
    state: State<'_, AppState>,
    source: String,
) -> CommandResult<BackupSummary> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.backup().restore_from(&source)).await
}
