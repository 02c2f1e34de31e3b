use std::sync::Arc;

use studiobook_app_lib::db::DbPool;
use studiobook_app_lib::models::client::ClientCreateInput;
use studiobook_app_lib::models::schedule::{BookingDraft, BookingStep};
use studiobook_app_lib::models::service::ServiceCreateInput;
use studiobook_app_lib::models::settings::ScheduleSettingsUpdateInput;
use studiobook_app_lib::services::booking_service::BookingService;
use studiobook_app_lib::services::catalog_service::CatalogService;
use studiobook_app_lib::services::client_service::ClientService;
use studiobook_app_lib::services::settings_service::SettingsService;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    booking: BookingService,
    settings: Arc<SettingsService>,
    client_id: String,
    service_id: String,
}

fn setup() -> Fixture {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("booking.sqlite");
    let pool = DbPool::new(db_path).expect("db pool");

    let client = ClientService::new(pool.clone())
        .create(ClientCreateInput {
            name: "Mara Lindt".into(),
            phone: Some("+49 170 5550101".into()),
            notes: None,
        })
        .expect("create client");

    let service = CatalogService::new(pool.clone())
        .create(ServiceCreateInput {
            category: "Portrait Session".into(),
            duration_minutes: Some(45),
            base_price: Some(500),
            description: None,
        })
        .expect("create service");

    let settings = Arc::new(SettingsService::new(pool.clone()));
    let booking = BookingService::new(pool, Arc::clone(&settings));

    Fixture {
        _dir: dir,
        booking,
        settings,
        client_id: client.id,
        service_id: service.id,
    }
}

fn draft(fixture: &Fixture, start_at: &str, duration_minutes: i64, price: i64) -> BookingDraft {
    BookingDraft {
        client_id: fixture.client_id.clone(),
        service_id: fixture.service_id.clone(),
        start_at: start_at.into(),
        duration_minutes,
        price,
        ..Default::default()
    }
}

#[test]
fn booking_on_an_empty_day_finalizes_directly() {
    let fixture = setup();

    let attempt = draft(&fixture, "2026-09-07T10:00:00+00:00", 45, 500);
    let step = fixture.booking.review(&attempt).expect("review");
    assert!(matches!(step, BookingStep::Finalized { .. }));

    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-07T10:00:00+00:00");
    assert_eq!(appointment.status, "planned");
    assert_eq!(appointment.price, 500);
}

#[test]
fn adjacent_appointment_triggers_preparation_offer() {
    let fixture = setup();

    // Monday 10:00-10:45, then a second attempt starting exactly at 10:45.
    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 45, 500))
        .expect("first booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:45:00+00:00", 45, 500);
    let step = fixture.booking.review(&attempt).expect("review");
    match step {
        BookingStep::NeedsPreparationChoice {
            shifted_start_at,
            preparation_minutes,
            ..
        } => {
            assert_eq!(shifted_start_at, "2026-09-07T11:00:00+00:00");
            assert_eq!(preparation_minutes, 15);
        }
        other => panic!("expected preparation offer, got {other:?}"),
    }

    attempt.accept_preparation = Some(true);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-07T11:00:00+00:00");
}

#[test]
fn declined_preparation_keeps_the_requested_start() {
    let fixture = setup();

    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 45, 500))
        .expect("first booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:45:00+00:00", 45, 500);
    attempt.accept_preparation = Some(false);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-07T10:45:00+00:00");
}

#[test]
fn conflict_offers_the_next_free_slot() {
    let fixture = setup();

    // Monday 10:00-11:00 occupied; an attempt at 10:30 overlaps it.
    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 60, 500))
        .expect("first booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:30:00+00:00", 30, 300);
    let step = fixture.booking.review(&attempt).expect("review");
    match step {
        BookingStep::NeedsAlternativeChoice {
            conflicting_appointment_ids,
            proposed,
        } => {
            assert_eq!(conflicting_appointment_ids.len(), 1);
            assert_eq!(proposed.start_at, "2026-09-07T11:00:00+00:00");
        }
        other => panic!("expected alternative offer, got {other:?}"),
    }

    attempt.accept_alternative = Some(true);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-07T11:00:00+00:00");
}

#[test]
fn declined_alternative_rejects_the_attempt() {
    let fixture = setup();

    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 60, 500))
        .expect("first booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:30:00+00:00", 30, 300);
    attempt.accept_alternative = Some(false);
    assert!(fixture.booking.finalize(&attempt).is_err());
}

#[test]
fn sunday_booking_carries_the_surcharge_when_accepted() {
    let fixture = setup();

    // 2026-09-06 is a Sunday, the default surcharge weekday.
    let mut attempt = draft(&fixture, "2026-09-06T10:00:00+00:00", 45, 500);
    let step = fixture.booking.review(&attempt).expect("review");
    match step {
        BookingStep::NeedsSurchargeChoice {
            surcharge_amount,
            adjusted_price,
            ..
        } => {
            assert_eq!(surcharge_amount, 100);
            assert_eq!(adjusted_price, 600);
        }
        other => panic!("expected surcharge offer, got {other:?}"),
    }

    attempt.apply_surcharge = Some(true);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.price, 600);

    let mut declined = draft(&fixture, "2026-09-06T14:00:00+00:00", 45, 500);
    declined.apply_surcharge = Some(false);
    let appointment = fixture.booking.finalize(&declined).expect("finalize");
    assert_eq!(appointment.price, 500);
}

#[test]
fn accepted_preparation_shift_can_land_on_a_conflict() {
    let fixture = setup();

    // 10:00-10:45 and 11:00-11:30 occupied. Accepting the buffer shifts the
    // 10:45 attempt to 11:00, which collides, so the next free slot is 11:30.
    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 45, 500))
        .expect("first booking");
    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T11:00:00+00:00", 30, 300))
        .expect("second booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:45:00+00:00", 30, 300);
    attempt.accept_preparation = Some(true);
    let step = fixture.booking.review(&attempt).expect("review");
    match step {
        BookingStep::NeedsAlternativeChoice { proposed, .. } => {
            assert_eq!(proposed.start_at, "2026-09-07T11:30:00+00:00");
        }
        other => panic!("expected alternative offer, got {other:?}"),
    }

    attempt.accept_alternative = Some(true);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-07T11:30:00+00:00");
}

#[test]
fn fully_booked_day_rolls_over_to_the_next_morning() {
    let fixture = setup();

    // One booking spanning the whole 09:00-21:00 window.
    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T09:00:00+00:00", 720, 500))
        .expect("full-day booking");

    let mut attempt = draft(&fixture, "2026-09-07T10:00:00+00:00", 30, 300);
    let step = fixture.booking.review(&attempt).expect("review");
    match step {
        BookingStep::NeedsAlternativeChoice { proposed, .. } => {
            assert_eq!(proposed.start_at, "2026-09-08T09:00:00+00:00");
        }
        other => panic!("expected alternative offer, got {other:?}"),
    }

    attempt.accept_alternative = Some(true);
    let appointment = fixture.booking.finalize(&attempt).expect("finalize");
    assert_eq!(appointment.start_at, "2026-09-08T09:00:00+00:00");
}

#[test]
fn exhausted_search_horizon_reports_no_slot() {
    let fixture = setup();

    fixture
        .settings
        .update(ScheduleSettingsUpdateInput {
            search_horizon_days: Some(1),
            ..Default::default()
        })
        .expect("shrink horizon");

    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T09:00:00+00:00", 720, 500))
        .expect("full-day booking");

    // The only searchable day is full, so no alternative can be proposed.
    let attempt = draft(&fixture, "2026-09-07T10:00:00+00:00", 30, 300);
    assert!(fixture.booking.review(&attempt).is_err());
}

#[test]
fn finalize_refuses_while_decisions_are_pending() {
    let fixture = setup();

    fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 60, 500))
        .expect("first booking");

    // Overlapping attempt with no recorded answer must not persist anything.
    let attempt = draft(&fixture, "2026-09-07T10:30:00+00:00", 30, 300);
    assert!(fixture.booking.finalize(&attempt).is_err());
}

#[test]
fn finalize_rejects_unknown_references() {
    let fixture = setup();

    let mut attempt = draft(&fixture, "2026-09-07T10:00:00+00:00", 45, 500);
    attempt.client_id = "missing-client".into();
    assert!(fixture.booking.review(&attempt).is_err());
    assert!(fixture.booking.finalize(&attempt).is_err());
}

#[test]
fn editing_preserves_status_and_frees_the_old_interval() {
    let fixture = setup();

    let original = fixture
        .booking
        .finalize(&draft(&fixture, "2026-09-07T10:00:00+00:00", 60, 500))
        .expect("first booking");

    // Moving the appointment onto its own old interval must not conflict
    // with itself.
    let mut edit = draft(&fixture, "2026-09-07T10:30:00+00:00", 60, 500);
    edit.appointment_id = Some(original.id.clone());
    let moved = fixture.booking.finalize(&edit).expect("edit");

    assert_eq!(moved.id, original.id);
    assert_eq!(moved.start_at, "2026-09-07T10:30:00+00:00");
    assert_eq!(moved.status, original.status);
    assert_eq!(moved.created_at, original.created_at);
}
