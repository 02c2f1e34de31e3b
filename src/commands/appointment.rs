use serde::Deserialize;
use tauri::State;

use crate::models::appointment::AppointmentRecord;

use super::{run_blocking, AppState, CommandResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentListFilters {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[tauri::command]
pub async fn appointments_list(
    state: State<'_, AppState>,
    filters: Option<AppointmentListFilters>,
) -> CommandResult<Vec<AppointmentRecord>> {
    let app_state = state.inner().clone();
    let filters = filters.unwrap_or_default();
    run_blocking(move || {
        let service = app_state.appointments();
        match (&filters.from, &filters.to) {
            (Some(from), Some(to)) => service.list_in_range(from, to),
            _ => match &filters.status {
                Some(status) => service.list_by_status(status),
                None => service.list(),
            },
        }
    })
    .await
}

#[tauri::command]
pub async fn appointments_get(
    state: State<'_, AppState>,
    id: String,
) -> CommandResult<AppointmentRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.appointments().get(&id)).await
}

#[tauri::command]
pub async fn appointments_set_status(
    state: State<'_, AppState>,
    id: String,
    status: String,
) -> CommandResult<AppointmentRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.appointments().set_status(&id, &status)).await
}

#[tauri::command]
pub async fn appointments_delete(state: State<'_, AppState>, id: String) -> CommandResult<()> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.appointments().delete(&id)).await
}
