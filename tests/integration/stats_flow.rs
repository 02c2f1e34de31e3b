use std::sync::Arc;

use studiobook_app_lib::db::DbPool;
use studiobook_app_lib::models::client::ClientCreateInput;
use studiobook_app_lib::models::schedule::BookingDraft;
use studiobook_app_lib::models::service::ServiceCreateInput;
use studiobook_app_lib::models::stats::{StatsGrouping, StatsQueryParams};
use studiobook_app_lib::services::appointment_service::AppointmentService;
use studiobook_app_lib::services::booking_service::BookingService;
use studiobook_app_lib::services::catalog_service::CatalogService;
use studiobook_app_lib::services::client_service::ClientService;
use studiobook_app_lib::services::settings_service::SettingsService;
use studiobook_app_lib::services::stats_service::StatsService;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    booking: BookingService,
    appointments: AppointmentService,
    stats: StatsService,
    client_a: String,
    client_b: String,
    portrait: String,
    product: String,
}

fn setup() -> Fixture {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("stats.sqlite")).expect("db pool");

    let clients = ClientService::new(pool.clone());
    let client_a = clients
        .create(ClientCreateInput {
            name: "Mara Lindt".into(),
            ..Default::default()
        })
        .expect("client a")
        .id;
    let client_b = clients
        .create(ClientCreateInput {
            name: "Jonas Weber".into(),
            ..Default::default()
        })
        .expect("client b")
        .id;

    let catalog = CatalogService::new(pool.clone());
    let portrait = catalog
        .create(ServiceCreateInput {
            category: "Portrait Session".into(),
            duration_minutes: Some(45),
            base_price: Some(500),
            description: None,
        })
        .expect("portrait")
        .id;
    let product = catalog
        .create(ServiceCreateInput {
            category: "Product Shoot".into(),
            duration_minutes: Some(30),
            base_price: Some(300),
            description: None,
        })
        .expect("product")
        .id;

    let settings = Arc::new(SettingsService::new(pool.clone()));
    Fixture {
        _dir: dir,
        booking: BookingService::new(pool.clone(), settings),
        appointments: AppointmentService::new(pool.clone()),
        stats: StatsService::new(pool),
        client_a,
        client_b,
        portrait,
        product,
    }
}

fn book(
    fixture: &Fixture,
    client_id: &str,
    service_id: &str,
    start_at: &str,
    duration_minutes: i64,
    price: i64,
) -> String {
    fixture
        .booking
        .finalize(&BookingDraft {
            client_id: client_id.into(),
            service_id: service_id.into(),
            start_at: start_at.into(),
            duration_minutes,
            price,
            ..Default::default()
        })
        .expect("book appointment")
        .id
}

fn seed(fixture: &Fixture) -> String {
    book(
        fixture,
        &fixture.client_a,
        &fixture.portrait,
        "2026-09-07T09:00:00+00:00",
        45,
        500,
    );
    book(
        fixture,
        &fixture.client_a,
        &fixture.portrait,
        "2026-09-08T09:00:00+00:00",
        45,
        500,
    );
    book(
        fixture,
        &fixture.client_b,
        &fixture.product,
        "2026-09-07T11:00:00+00:00",
        30,
        300,
    );
    // This one gets canceled and must vanish from every aggregate.
    book(
        fixture,
        &fixture.client_b,
        &fixture.product,
        "2026-09-08T11:00:00+00:00",
        30,
        300,
    )
}

#[test]
fn canceled_appointments_are_excluded_from_all_aggregates() {
    let fixture = setup();
    let canceled_id = seed(&fixture);
    fixture
        .appointments
        .set_status(&canceled_id, "canceled")
        .expect("cancel");

    let params = StatsQueryParams::default();

    let overview = fixture.stats.overview(&params).expect("overview");
    assert_eq!(overview.total_appointments, 3);
    assert_eq!(overview.total_revenue, 1300);
    assert!((overview.average_price - 1300.0 / 3.0).abs() < 1e-9);
    assert_eq!(overview.top_service_id.as_deref(), Some(fixture.portrait.as_str()));
    assert_eq!(overview.top_client_id.as_deref(), Some(fixture.client_a.as_str()));
}

#[test]
fn day_buckets_come_back_in_chronological_order() {
    let fixture = setup();
    seed(&fixture);

    let params = StatsQueryParams {
        grouping: StatsGrouping::Day,
        ..Default::default()
    };
    let buckets = fixture.stats.buckets(&params).expect("buckets");

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].label, "2026-09-07");
    assert_eq!(buckets[0].count, 2);
    assert_eq!(buckets[0].revenue, 800);
    assert_eq!(buckets[1].label, "2026-09-08");
    assert_eq!(buckets[1].count, 2);
    assert_eq!(buckets[1].revenue, 800);
}

#[test]
fn range_bounds_are_half_open() {
    let fixture = setup();
    seed(&fixture);

    // From the start of the 8th up to but not including the 9th.
    let params = StatsQueryParams {
        grouping: StatsGrouping::Day,
        from: Some("2026-09-08T00:00:00+00:00".into()),
        to: Some("2026-09-09T00:00:00+00:00".into()),
    };
    let buckets = fixture.stats.buckets(&params).expect("buckets");

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].label, "2026-09-08");
    assert_eq!(buckets[0].count, 2);
}

#[test]
fn category_revenue_sorts_highest_first() {
    let fixture = setup();
    seed(&fixture);

    let rows = fixture
        .stats
        .category_revenue(&StatsQueryParams::default())
        .expect("category revenue");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Portrait Session");
    assert_eq!(rows[0].revenue, 1000);
    assert_eq!(rows[1].category, "Product Shoot");
    assert_eq!(rows[1].revenue, 600);
}

#[test]
fn empty_store_produces_empty_aggregates() {
    let fixture = setup();

    let params = StatsQueryParams::default();
    assert!(fixture.stats.buckets(&params).expect("buckets").is_empty());

    let overview = fixture.stats.overview(&params).expect("overview");
    assert_eq!(overview.total_appointments, 0);
    assert_eq!(overview.total_revenue, 0);
    assert_eq!(overview.average_price, 0.0);
    assert!(overview.top_service_id.is_none());
    assert!(overview.top_client_id.is_none());
}
