use tauri::State;

use crate::models::stats::{CategoryRevenue, StatsBucket, StatsOverview, StatsQueryParams};

use super::{run_blocking, AppState, CommandResult};

#[tauri::command]
pub async fn stats_buckets(
    state: State<'_, AppState>,
    params: StatsQueryParams,
) -> CommandResult<Vec<StatsBucket>> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.stats().buckets(&params)).await
}

#[tauri::command]
pub async fn stats_category_revenue(
    state: State<'_, AppState>,
    params: StatsQueryParams,
) -> CommandResult<Vec<CategoryRevenue>> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.stats().category_revenue(&params)).await
}

#[tauri::command]
pub async fn stats_overview(
    state: State<'_, AppState>,
    params: StatsQueryParams,
) -> CommandResult<StatsOverview> {
    let app_state = state.inner().clone();
    run_blocking(move || app_state.stats().overview(&params)).await
}
