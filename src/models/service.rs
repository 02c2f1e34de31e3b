use serde::{Deserialize, Serialize};

/// A bookable service from the studio catalog. `category` is a free-text
/// display name; suggested categories live in the UI, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    pub category: String,
    pub duration_minutes: i64,
    pub base_price: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateInput {
    pub category: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub base_price: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateInput {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub base_price: Option<i64>,
    #[serde(default)]
    pub description: Option<Option<String>>,
}
