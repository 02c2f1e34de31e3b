use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatsGrouping {
    Day,
    Week,
    Month,
    Year,
    #[serde(rename = "all")]
    AllTime,
}

impl StatsGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsGrouping::Day => "day",
            StatsGrouping::Week => "week",
            StatsGrouping::Month => "month",
            StatsGrouping::Year => "year",
            StatsGrouping::AllTime => "all",
        }
    }
}

impl Default for StatsGrouping {
    fn default() -> Self {
        StatsGrouping::Day
    }
}

/// One chronological bucket. Labels are ISO-formatted so ascending lexical
/// order is ascending chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsBucket {
    pub label: String,
    pub count: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenue {
    pub category: String,
    pub count: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_appointments: i64,
    pub total_revenue: i64,
    pub average_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsQueryParams {
    #[serde(default)]
    pub grouping: StatsGrouping,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}
