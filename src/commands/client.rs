use tauri::State;

use crate::models::client::{ClientCreateInput, ClientRecord, ClientUpdateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn clients_list(state: State<'_, AppState>) -> CommandResult<Vec<ClientRecord>> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.clients().list()).await
}

#[tauri::command]
pub async fn clients_get(state: State<'_, AppState>, id: String) -> CommandResult<ClientRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.clients().get(&id)).await
}

#[tauri::command]
pub async fn clients_create(
    state: State<'_, AppState>,
    payload: ClientCreateInput,
) -> CommandResult<ClientRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.clients().create(payload)).await
}

#[tauri::command]
pub async fn clients_update(
    state: State<'_, AppState>,
    id: String,
    payload: ClientUpdateInput,
) -> CommandResult<ClientRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.clients().update(&id, payload)).await
}

#[tauri::command]
pub async fn clients_delete(state: State<'_, AppState>, id: String) -> CommandResult<()> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.clients().delete(&id)).await
}
