use tauri::State;

use crate::models::settings::{ScheduleSettings, ScheduleSettingsUpdateInput};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn settings_get(state: State<'_, AppState>) -> CommandResult<ScheduleSettings> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.settings().get()).await
}

#[tauri::command]
pub async fn settings_update(
    state: State<'_, AppState>,
    payload: ScheduleSettingsUpdateInput,
) -> CommandResult<ScheduleSettings> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.settings().update(payload)).await
}
