use tauri::State;

use crate::models::service::{ServiceCreateInput, ServiceRecord, ServiceUpdateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn services_list(state: State<'_, AppState>) -> CommandResult<Vec<ServiceRecord>> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.catalog().list()).await
}

#[tauri::command]
pub async fn services_get(state: State<'_, AppState>, id: String) -> CommandResult<ServiceRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.catalog().get(&id)).await
}

#[tauri::command]
pub async fn services_create(
    state: State<'_, AppState>,
    payload: ServiceCreateInput,
) -> CommandResult<ServiceRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.catalog().create(payload)).await
}

#[tauri::command]
pub async fn services_update(
    state: State<'_, AppState>,
    id: String,
    payload: ServiceUpdateInput,
) -> CommandResult<ServiceRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.catalog().update(&id, payload)).await
}

#[tauri::command]
pub async fn services_delete(state: State<'_, AppState>, id: String) -> CommandResult<()> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.catalog().delete(&id)).await
}
