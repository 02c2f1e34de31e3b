use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, FixedOffset};
use tracing::{debug, warn};

use crate::db::repositories::appointment_repository::AppointmentRepository;
use crate::db::repositories::service_repository::ServiceRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::appointment::AppointmentRecord;
use crate::models::service::ServiceRecord;
use crate::models::stats::{CategoryRevenue, StatsBucket, StatsGrouping, StatsOverview, StatsQueryParams};
use crate::services::schedule_utils::parse_datetime;

const ALL_TIME_LABEL: &str = "all";

fn parsed_start(appointment: &AppointmentRecord) -> Option<DateTime<FixedOffset>> {
    match parse_datetime(&appointment.start_at) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                target: "app::stats",
                appointment_id = %appointment.id,
                start_at = %appointment.start_at,
                "skipping appointment with unparseable start"
            );
            None
        }
    }
}

fn bucket_label(start: DateTime<FixedOffset>, grouping: StatsGrouping) -> String {
    match grouping {
        StatsGrouping::Day => start.date_naive().format("%Y-%m-%d").to_string(),
        StatsGrouping::Week => {
            let monday =
                start.date_naive() - Duration::days(start.weekday().num_days_from_monday() as i64);
            monday.format("%Y-%m-%d").to_string()
        }
        StatsGrouping::Month => start.date_naive().format("%Y-%m").to_string(),
        StatsGrouping::Year => start.date_naive().format("%Y").to_string(),
        StatsGrouping::AllTime => ALL_TIME_LABEL.to_string(),
    }
}

/// Group appointments into chronological buckets with counts and revenue
/// sums. Labels are ISO-formatted, so the BTreeMap's lexical order is
/// chronological order; `AllTime` is a single bucket. Pure and idempotent.
pub fn aggregate(appointments: &[AppointmentRecord], grouping: StatsGrouping) -> Vec<StatsBucket> {
    let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();

    for appointment in appointments {
        let Some(start) = parsed_start(appointment) else {
            continue;
        };
        let entry = buckets
            .entry(bucket_label(start, grouping))
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += appointment.price;
    }

    buckets
        .into_iter()
        .map(|(label, (count, revenue))| StatsBucket {
            label,
            count,
            revenue,
        })
        .collect()
}

/// Revenue summed per service category, highest first; ties break on the
/// category name.
pub fn revenue_by_category(
    appointments: &[AppointmentRecord],
    services: &[ServiceRecord],
) -> Vec<CategoryRevenue> {
    let category_by_id: HashMap<&str, &str> = services
        .iter()
        .map(|service| (service.id.as_str(), service.category.as_str()))
        .collect();

    let mut totals: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for appointment in appointments {
        let category = category_by_id
            .get(appointment.service_id.as_str())
            .copied()
            .unwrap_or("unknown");
        let entry = totals.entry(category.to_string()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += appointment.price;
    }

    let mut result: Vec<CategoryRevenue> = totals
        .into_iter()
        .map(|(category, (count, revenue))| CategoryRevenue {
            category,
            count,
            revenue,
        })
        .collect();
    result.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.category.cmp(&b.category)));
    result
}

/// Totals plus the most-frequent service and client. Equal counts break on
/// the lowest id, so the result is deterministic for a given input.
pub fn overview(appointments: &[AppointmentRecord]) -> StatsOverview {
    let total_appointments = appointments.len() as i64;
    let total_revenue: i64 = appointments.iter().map(|a| a.price).sum();
    let average_price = if total_appointments == 0 {
        0.0
    } else {
        total_revenue as f64 / total_appointments as f64
    };

    StatsOverview {
        total_appointments,
        total_revenue,
        average_price,
        top_service_id: most_frequent(appointments.iter().map(|a| a.service_id.as_str())),
        top_client_id: most_frequent(appointments.iter().map(|a| a.client_id.as_str())),
    }
}

fn most_frequent<'a>(ids: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(id, _)| id.to_string())
}

/// Db-backed facade: fetches non-canceled appointments (optionally limited
/// to a range) and delegates to the pure aggregation functions.
#[derive(Clone)]
pub struct StatsService {
    db: DbPool,
}

impl StatsService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn buckets(&self, params: &StatsQueryParams) -> AppResult<Vec<StatsBucket>> {
        let appointments = self.fetch(params)?;
        let buckets = aggregate(&appointments, params.grouping);
        debug!(
            target: "app::stats",
            grouping = params.grouping.as_str(),
            buckets = buckets.len(),
            "aggregated appointment buckets"
        );
        Ok(buckets)
    }

    pub fn category_revenue(&self, params: &StatsQueryParams) -> AppResult<Vec<CategoryRevenue>> {
        let appointments = self.fetch(params)?;
        let services = self
            .db
            .with_connection(|conn| ServiceRepository::list_all(conn))?
            .into_iter()
            .map(|row| row.into_record())
            .collect::<Vec<_>>();
        Ok(revenue_by_category(&appointments, &services))
    }

    pub fn overview(&self, params: &StatsQueryParams) -> AppResult<StatsOverview> {
        let appointments = self.fetch(params)?;
        Ok(overview(&appointments))
    }

    fn fetch(&self, params: &StatsQueryParams) -> AppResult<Vec<AppointmentRecord>> {
        let from = params.from.as_deref().map(parse_datetime).transpose()?;
        let to = params.to.as_deref().map(parse_datetime).transpose()?;

        let rows = self
            .db
            .with_connection(|conn| AppointmentRepository::list_all(conn))?;

        let appointments = rows
            .into_iter()
            .map(|row| row.into_record())
            .filter(|appointment| !appointment.is_canceled())
            .filter(|appointment| match parsed_start(appointment) {
                Some(start) => {
                    from.map_or(true, |lower| start >= lower)
                        && to.map_or(true, |upper| start < upper)
                }
                None => false,
            })
            .collect();

        Ok(appointments)
    }
}
