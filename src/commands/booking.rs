use tauri::State;

use crate::models::appointment::AppointmentRecord;
use crate::models::schedule::{BookingDraft, BookingStep};

use super::{run_blocking, AppState, CommandResult};

/// Evaluates a draft against the current calendar and reports the next
/// decision the user has to make, without writing anything.
#[tauri::command]
pub async fn booking_review(
    state: State<'_, AppState>,
    draft: BookingDraft,
) -> CommandResult<BookingStep> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.booking().review(&draft)).await
}

/// Re-evaluates the draft on fresh data and persists the appointment if
/// every pending decision has been answered.
#[tauri::command]
pub async fn booking_finalize(
    state: State<'_, AppState>,
    draft: BookingDraft,
) -> CommandResult<AppointmentRecord> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.booking().finalize(&draft)).await
}
