use tauri::State;

use crate::error::AppError;
use crate::models::schedule::TimeSlot;

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn schedule_day_slots(
    state: State<'_, AppState>,
    day: String,
) -> CommandResult<Vec<TimeSlot>> {
    let app_state = state.inner().clone();
    run_blocking(move || {
        let settings = app_state.settings().get()?;
        app_state.availability().day_slots(&day, &settings)
    })
    .await
}

/// Finds the earliest free slot of the given length, starting the search
/// at `searchFrom`. Errors with NO_SLOT_AVAILABLE when the horizon is
/// exhausted.
#[tauri::command]
pub async fn schedule_next_slot(
    state: State<'_, AppState>,
    duration_minutes: i64,
    search_from: String,
) -> CommandResult<TimeSlot> {
    let app_state = state.inner().clone();
    run_blocking(move || {
        let settings = app_state.settings().get()?;
        app_state
            .availability()
            .next_available_slot(duration_minutes, &search_from, &settings)?
            .ok_or_else(AppError::no_slot_available)
    })
    .await
}
