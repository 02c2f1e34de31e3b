use std::sync::Arc;

use studiobook_app_lib::db::DbPool;
use studiobook_app_lib::models::client::ClientCreateInput;
use studiobook_app_lib::models::schedule::BookingDraft;
use studiobook_app_lib::models::service::ServiceCreateInput;
use studiobook_app_lib::services::appointment_service::AppointmentService;
use studiobook_app_lib::services::booking_service::BookingService;
use studiobook_app_lib::services::catalog_service::CatalogService;
use studiobook_app_lib::services::client_service::ClientService;
use studiobook_app_lib::services::settings_service::SettingsService;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    booking: BookingService,
    appointments: AppointmentService,
    client_id: String,
    service_id: String,
}

fn setup() -> Fixture {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("appointments.sqlite")).expect("db pool");

    let client_id = ClientService::new(pool.clone())
        .create(ClientCreateInput {
            name: "Mara Lindt".into(),
            ..Default::default()
        })
        .expect("client")
        .id;
    let service_id = CatalogService::new(pool.clone())
        .create(ServiceCreateInput {
            category: "Portrait Session".into(),
            duration_minutes: Some(45),
            base_price: Some(500),
            description: None,
        })
        .expect("service")
        .id;

    let settings = Arc::new(SettingsService::new(pool.clone()));
    Fixture {
        _dir: dir,
        booking: BookingService::new(pool.clone(), settings),
        appointments: AppointmentService::new(pool),
        client_id,
        service_id,
    }
}

fn book(fixture: &Fixture, start_at: &str) -> String {
    fixture
        .booking
        .finalize(&BookingDraft {
            client_id: fixture.client_id.clone(),
            service_id: fixture.service_id.clone(),
            start_at: start_at.into(),
            duration_minutes: 45,
            price: 500,
            ..Default::default()
        })
        .expect("book")
        .id
}

#[test]
fn appointment_lifecycle() {
    let fixture = setup();
    let id = book(&fixture, "2026-09-07T10:00:00+00:00");

    let fetched = fixture.appointments.get(&id).expect("get");
    assert_eq!(fetched.status, "planned");

    let completed = fixture
        .appointments
        .set_status(&id, "completed")
        .expect("complete");
    assert_eq!(completed.status, "completed");

    let by_status = fixture
        .appointments
        .list_by_status("completed")
        .expect("list by status");
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].id, id);

    fixture.appointments.delete(&id).expect("delete");
    assert!(fixture.appointments.get(&id).is_err());
}

#[test]
fn invalid_status_is_rejected() {
    let fixture = setup();
    let id = book(&fixture, "2026-09-07T10:00:00+00:00");

    assert!(fixture.appointments.set_status(&id, "postponed").is_err());

    // Casing is normalized rather than rejected.
    let missed = fixture
        .appointments
        .set_status(&id, "MISSED")
        .expect("missed");
    assert_eq!(missed.status, "missed");
}

#[test]
fn list_in_range_uses_half_open_bounds() {
    let fixture = setup();
    book(&fixture, "2026-09-07T10:00:00+00:00");
    let tuesday = book(&fixture, "2026-09-08T10:00:00+00:00");
    book(&fixture, "2026-09-09T10:00:00+00:00");

    let in_range = fixture
        .appointments
        .list_in_range("2026-09-08T00:00:00+00:00", "2026-09-09T00:00:00+00:00")
        .expect("list in range");

    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].id, tuesday);

    let all = fixture.appointments.list().expect("list all");
    assert_eq!(all.len(), 3);
}

#[test]
fn offset_bookings_are_stored_in_utc_and_range_queries_match() {
    let fixture = setup();

    // 12:00 at +02:00 is 10:00 UTC.
    let id = book(&fixture, "2026-09-08T12:00:00+02:00");
    let stored = fixture.appointments.get(&id).expect("get");
    assert_eq!(stored.start_at, "2026-09-08T10:00:00+00:00");

    // Bounds in a different offset still select the same instant.
    let in_range = fixture
        .appointments
        .list_in_range("2026-09-08T05:00:00-05:00", "2026-09-09T00:00:00+00:00")
        .expect("list in range");
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].id, id);

    let before = fixture
        .appointments
        .list_in_range("2026-09-08T00:00:00+00:00", "2026-09-08T10:00:00+00:00")
        .expect("list before");
    assert!(before.is_empty());
}

#[test]
fn missing_appointment_reports_not_found() {
    let fixture = setup();
    assert!(fixture.appointments.get("nope").is_err());
    assert!(fixture.appointments.set_status("nope", "completed").is_err());
    assert!(fixture.appointments.delete("nope").is_err());
}
