use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

const USER_VERSION: i32 = 1;

pub fn run(conn: &Connection) -> AppResult<()> {
    // Ensure migration history table exists
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS migration_history (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL,
            rollback_sql TEXT
        );
        "#,
    )?;

    let mut current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version < 1 {
        info!(target: "app::db", version = current_version, "running migration v1");
        migrate_to_v1(conn)?;
        current_version = 1;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(conn, 1, "Add per-client appointment index", None)?;
    }

    debug_assert!(current_version >= USER_VERSION);

    Ok(())
}

fn migrate_to_v1(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_client_id ON appointments(client_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_service_id ON appointments(service_id);
        "#,
    )?;
    Ok(())
}

fn record_migration(
    conn: &Connection,
    version: i32,
    description: &str,
    rollback_sql: Option<&str>,
) -> AppResult<()> {
    conn.execute(
        r#"
        INSERT OR IGNORE INTO migration_history (version, description, applied_at, rollback_sql)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        rusqlite::params![
            version,
            description,
            chrono::Utc::now().to_rfc3339(),
            rollback_sql
        ],
    )?;
    Ok(())
}
