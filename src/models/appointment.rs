use serde::{Deserialize, Serialize};

pub const STATUS_PLANNED: &str = "planned";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELED: &str = "canceled";
pub const STATUS_MISSED: &str = "missed";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PLANNED,
    STATUS_COMPLETED,
    STATUS_CANCELED,
    STATUS_MISSED,
];

/// A booked appointment. `start_at` is RFC3339 with minute precision; the
/// end is derived as `start_at + duration_minutes` and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    pub id: String,
    pub client_id: String,
    pub service_id: String,
    pub start_at: String,
    pub duration_minutes: i64,
    pub price: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AppointmentRecord {
    pub fn is_canceled(&self) -> bool {
        self.status == STATUS_CANCELED
    }
}
