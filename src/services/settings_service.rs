use std::sync::RwLock;

use chrono::Utc;
use serde_json::json;

use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::{ScheduleSettings, ScheduleSettingsUpdateInput};
use crate::services::schedule_utils::MINUTES_PER_DAY;

const KEY_WORKDAY_START: &str = "workday_start_minute";
const KEY_WORKDAY_END: &str = "workday_end_minute";
const KEY_SLOT_MINUTES: &str = "slot_minutes";
const KEY_PREPARATION_MINUTES: &str = "preparation_minutes";
const KEY_SURCHARGE_WEEKDAY: &str = "surcharge_weekday";
const KEY_SURCHARGE_AMOUNT: &str = "surcharge_amount";
const KEY_SEARCH_HORIZON_DAYS: &str = "search_horizon_days";

const DEFAULT_WORKDAY_START: i64 = 9 * 60;
const DEFAULT_WORKDAY_END: i64 = 21 * 60;
const DEFAULT_SLOT_MINUTES: i64 = 30;
const DEFAULT_PREPARATION_MINUTES: i64 = 15;
const DEFAULT_SURCHARGE_WEEKDAY: i64 = 6; // Sunday, counted from Monday
const DEFAULT_SURCHARGE_AMOUNT: i64 = 100;
const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 14;

/// Scheduling configuration stored in the `app_settings` key/value table.
/// The business-day window, slot granularity, preparation buffer, surcharge
/// rule and search horizon are all configuration, not hardcoded rules.
pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<ScheduleSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<ScheduleSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update(&self, input: ScheduleSettingsUpdateInput) -> AppResult<ScheduleSettings> {
        let mut current = self.get()?;

        if let Some(value) = input.workday_start_minute {
            ensure_minute_of_day(value)?;
            current.workday_start_minute = value;
        }
        if let Some(value) = input.workday_end_minute {
            ensure_minute_of_day(value)?;
            current.workday_end_minute = value;
        }
        if current.workday_start_minute >= current.workday_end_minute {
            return Err(AppError::validation(
                "workday start must be earlier than workday end",
            ));
        }

        if let Some(value) = input.slot_minutes {
            ensure_positive("slot minutes", value)?;
            current.slot_minutes = value;
        }
        if let Some(value) = input.preparation_minutes {
            ensure_positive("preparation minutes", value)?;
            current.preparation_minutes = value;
        }
        if let Some(value) = input.surcharge_weekday {
            if !(0..=6).contains(&value) {
                return Err(AppError::validation_with_details(
                    "surcharge weekday must be 0 (Monday) through 6 (Sunday)",
                    json!({ "surchargeWeekday": value }),
                ));
            }
            current.surcharge_weekday = value;
        }
        if let Some(value) = input.surcharge_amount {
            if value < 0 {
                return Err(AppError::validation("surcharge amount must not be negative"));
            }
            current.surcharge_amount = value;
        }
        if let Some(value) = input.search_horizon_days {
            ensure_positive("search horizon days", value)?;
            current.search_horizon_days = value;
        }

        current.updated_at = Utc::now().to_rfc3339();
        self.persist(&current)?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    fn load_from_db(&self) -> AppResult<ScheduleSettings> {
        self.db.with_connection(|conn| {
            let mut settings = ScheduleSettings {
                workday_start_minute: DEFAULT_WORKDAY_START,
                workday_end_minute: DEFAULT_WORKDAY_END,
                slot_minutes: DEFAULT_SLOT_MINUTES,
                preparation_minutes: DEFAULT_PREPARATION_MINUTES,
                surcharge_weekday: DEFAULT_SURCHARGE_WEEKDAY,
                surcharge_amount: DEFAULT_SURCHARGE_AMOUNT,
                search_horizon_days: DEFAULT_SEARCH_HORIZON_DAYS,
                updated_at: String::new(),
            };

            for row in SettingsRepository::list(conn)? {
                let parsed: Option<i64> = row.value.parse().ok();
                let Some(value) = parsed else { continue };
                match row.key.as_str() {
                    KEY_WORKDAY_START => settings.workday_start_minute = value,
                    KEY_WORKDAY_END => settings.workday_end_minute = value,
                    KEY_SLOT_MINUTES => settings.slot_minutes = value,
                    KEY_PREPARATION_MINUTES => settings.preparation_minutes = value,
                    KEY_SURCHARGE_WEEKDAY => settings.surcharge_weekday = value,
                    KEY_SURCHARGE_AMOUNT => settings.surcharge_amount = value,
                    KEY_SEARCH_HORIZON_DAYS => settings.search_horizon_days = value,
                    _ => {}
                }
                if row.updated_at > settings.updated_at {
                    settings.updated_at = row.updated_at;
                }
            }

            Ok(settings)
        })
    }

    fn persist(&self, settings: &ScheduleSettings) -> AppResult<()> {
        let entries = [
            (KEY_WORKDAY_START, settings.workday_start_minute.to_string()),
            (KEY_WORKDAY_END, settings.workday_end_minute.to_string()),
            (KEY_SLOT_MINUTES, settings.slot_minutes.to_string()),
            (
                KEY_PREPARATION_MINUTES,
                settings.preparation_minutes.to_string(),
            ),
            (KEY_SURCHARGE_WEEKDAY, settings.surcharge_weekday.to_string()),
            (KEY_SURCHARGE_AMOUNT, settings.surcharge_amount.to_string()),
            (
                KEY_SEARCH_HORIZON_DAYS,
                settings.search_horizon_days.to_string(),
            ),
        ];
        self.db
            .with_connection(|conn| SettingsRepository::upsert_many(conn, &entries))
    }
}

fn ensure_minute_of_day(value: i64) -> AppResult<()> {
    if !(0..=MINUTES_PER_DAY).contains(&value) {
        return Err(AppError::validation_with_details(
            "minute of day must be between 0 and 1440",
            json!({ "minute": value }),
        ));
    }
    Ok(())
}

fn ensure_positive(name: &str, value: i64) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::validation_with_details(
            format!("{name} must be positive"),
            json!({ "value": value }),
        ));
    }
    Ok(())
}
