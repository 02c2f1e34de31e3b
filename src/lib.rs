pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(error) = try_run() {
        eprintln!("failed to launch application: {error}");
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let handle = app.handle();

            crate::utils::logger::init_logging(&handle)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let mut data_dir = handle
                .path()
                .app_data_dir()
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            std::fs::create_dir_all(&data_dir)?;
            data_dir.push("studiobook.sqlite");

            let pool = crate::db::DbPool::new(&data_dir)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;

            let state = crate::commands::AppState::new(pool)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error>)?;
            app.manage(state);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            crate::commands::booking::booking_review,
            crate::commands::booking::booking_finalize,
            crate::commands::schedule::schedule_day_slots,
            crate::commands::schedule::schedule_next_slot,
            crate::commands::appointment::appointments_list,
            crate::commands::appointment::appointments_get,
            crate::commands::appointment::appointments_set_status,
            crate::commands::appointment::appointments_delete,
            crate::commands::client::clients_list,
            crate::commands::client::clients_get,
            crate::commands::client::clients_create,
            crate::commands::client::clients_update,
            crate::commands::client::clients_delete,
            crate::commands::catalog::services_list,
            crate::commands::catalog::services_get,
            crate::commands::catalog::services_create,
            crate::commands::catalog::services_update,
            crate::commands::catalog::services_delete,
            crate::commands::stats::stats_buckets,
            crate::commands::stats::stats_category_revenue,
            crate::commands::stats::stats_overview,
            crate::commands::settings::settings_get,
            crate::commands::settings::settings_update,
            crate::commands::backup::backup_create,
            crate::commands::backup::backup_restore,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
