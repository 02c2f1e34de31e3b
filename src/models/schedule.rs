use serde::{Deserialize, Serialize};

use crate::models::appointment::AppointmentRecord;

/// One granularity-sized unit of the business day. Derived on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_at: String,
    pub end_at: String,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

/// A booking attempt in flight. The caller fills the candidate fields, the
/// engine surfaces pending decisions as [`BookingStep`] variants, and the
/// caller records each answer here before re-running the engine. For edits,
/// `appointment_id` names the record excluded from conflict checks.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(default)]
    pub appointment_id: Option<String>,
    pub client_id: String,
    pub service_id: String,
    pub start_at: String,
    pub duration_minutes: i64,
    pub price: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub accept_preparation: Option<bool>,
    #[serde(default)]
    pub accept_alternative: Option<bool>,
    #[serde(default)]
    pub apply_surcharge: Option<bool>,
}

/// Outcome of one run of the booking engine: either the next decision the
/// caller has to make, or the finalized appointment ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum BookingStep {
    /// An appointment ends exactly at the candidate start; offer shifting
    /// the start forward by the preparation buffer.
    NeedsPreparationChoice {
        preceding_appointment_id: String,
        shifted_start_at: String,
        preparation_minutes: i64,
    },
    /// The candidate interval conflicts; offer the earliest free slot.
    NeedsAlternativeChoice {
        conflicting_appointment_ids: Vec<String>,
        proposed: TimeSlot,
    },
    /// The candidate start falls on the surcharge weekday.
    NeedsSurchargeChoice {
        start_at: String,
        surcharge_amount: i64,
        adjusted_price: i64,
    },
    Finalized { appointment: AppointmentRecord },
}
