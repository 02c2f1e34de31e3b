use serde::{Deserialize, Serialize};

/// Scheduling configuration. Minutes are counted from midnight, the
/// surcharge weekday from Monday (0 = Monday, 6 = Sunday).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub workday_start_minute: i64,
    pub workday_end_minute: i64,
    pub slot_minutes: i64,
    pub preparation_minutes: i64,
    pub surcharge_weekday: i64,
    pub surcharge_amount: i64,
    pub search_horizon_days: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettingsUpdateInput {
    #[serde(default)]
    pub workday_start_minute: Option<i64>,
    #[serde(default)]
    pub workday_end_minute: Option<i64>,
    #[serde(default)]
    pub slot_minutes: Option<i64>,
    #[serde(default)]
    pub preparation_minutes: Option<i64>,
    #[serde(default)]
    pub surcharge_weekday: Option<i64>,
    #[serde(default)]
    pub surcharge_amount: Option<i64>,
    #[serde(default)]
    pub search_horizon_days: Option<i64>,
}
