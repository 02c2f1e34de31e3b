use std::convert::TryFrom;

use rusqlite::{named_params, Connection, Row};

use crate::error::AppResult;

/// One key/value pair from `app_settings`. Values are stored as strings;
/// the settings service owns parsing them into scheduling parameters.
#[derive(Debug, Clone)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl TryFrom<&Row<'_>> for SettingRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            key: row.get("key")?,
            value: row.get("value")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct SettingsRepository;

impl SettingsRepository {
    pub fn list(conn: &Connection) -> AppResult<Vec<SettingRow>> {
        let mut stmt =
            conn.prepare("SELECT key, value, updated_at FROM app_settings ORDER BY key ASC")?;

        let rows = stmt
            .query_map([], |row| SettingRow::try_from(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Writes every entry through one prepared statement. Settings are
    /// always saved as a full set, never one key at a time.
    pub fn upsert_many(conn: &Connection, entries: &[(&str, String)]) -> AppResult<()> {
        let mut stmt = conn.prepare(
            r#"
                INSERT INTO app_settings (key, value)
                VALUES (:key, :value)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP
            "#,
        )?;

        for (key, value) in entries {
            stmt.execute(named_params! {":key": key, ":value": value})?;
        }

        Ok(())
    }
}
