use chrono::{TimeZone, Utc};

use varaus_admin::{
    models::{
        FieldErrors, FieldFeedback, Reservation, ReservationDraft, ReservationState,
        SavedReservation,
    },
    repository::PersistenceError,
    services::{
        reservations::{AttemptState, ValidationFailure},
        AppEvent,
    },
};

use crate::common::{context, record_events, MockPersistence};

const REQUIRED: [&str; 6] = [
    "begin",
    "end",
    "resource",
    "reserver_name",
    "reserver_email_address",
    "reserver_phone_number",
];

fn draft() -> ReservationDraft {
    ReservationDraft::from_pairs([
        ("begin", "1.6.2024 10:00"),
        ("end", "1.6.2025 10:00"),
        ("resource", "res-a"),
        ("user", "42"),
        ("reserver_name", "Maija Virtanen"),
        ("reserver_email_address", "maija@example.fi"),
        ("reserver_phone_number", "0501234567"),
        ("reserver_address_street", "Laivurinkatu 3"),
        ("reserver_address_zip", "00150"),
        ("reserver_address_city", "Helsinki"),
        ("reserver_ssn", "120385-999X"),
        ("description", "Purjevene"),
    ])
    .with_required(REQUIRED)
}

fn saved(id: i64) -> SavedReservation {
    SavedReservation {
        id,
        attributes: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn test_save_new_reservation() {
    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .withf(|r: &Reservation| {
            r.id.is_none()
                && r.state == ReservationState::Confirmed
                && !r.reservable
                && r.berth.as_ref().map(|b| b.id) == Some(11)
        })
        .times(1)
        .returning(|_| Ok(saved(501)));

    let ctx = context(persistence);
    let events = record_events(&ctx);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();

    let state = ctx.save_reservation(&mut reservation, &draft(), &mut feedback).await;

    assert_eq!(state, AttemptState::Committed(501));
    assert!(feedback.is_clean());
    assert_eq!(reservation.id, Some(501));
    assert_eq!(reservation.begin, Some(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap()));
    assert_eq!(reservation.end, Some(Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap()));
    assert_eq!(reservation.user.as_ref().map(|u| u.id.as_str()), Some("42"));
    assert_eq!(reservation.reserver_ssn, "120385-999X");
    assert_eq!(reservation.reservation.reserver_address_city, "Helsinki");
    assert_eq!(reservation.reservation.description.get("fi"), "Purjevene");
    assert_eq!(*events.lock().unwrap(), vec![AppEvent::ReservationChanged(501)]);
}

#[tokio::test]
async fn test_winter_dates_use_standard_time() {
    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .withf(|r: &Reservation| {
            r.begin == Some(Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap())
                && r.end == Some(Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap())
        })
        .times(1)
        .returning(|_| Ok(saved(502)));

    let ctx = context(persistence);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();
    let mut form = draft();
    form.set_field("begin", "15.1.2025 10:00");
    form.set_field("end", "15.1.2026 10:00");

    let state = ctx.save_reservation(&mut reservation, &form, &mut feedback).await;
    assert_eq!(state, AttemptState::Committed(502));
}

#[tokio::test]
async fn test_missing_required_field_never_reaches_backend() {
    let mut persistence = MockPersistence::new();
    persistence.expect_save().never();

    let ctx = context(persistence);
    let events = record_events(&ctx);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();
    let mut form = draft();
    form.set_field("reserver_phone_number", "");

    let state = ctx.save_reservation(&mut reservation, &form, &mut feedback).await;

    assert_eq!(
        state,
        AttemptState::Rejected(ValidationFailure::Required(vec!["reserver_phone_number".into()]))
    );
    assert!(feedback.is_invalid("reserver_phone_number"));
    assert!(!feedback.is_invalid("reserver_name"));
    assert_eq!(reservation, Reservation::default());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_optional_field_may_be_empty() {
    let mut persistence = MockPersistence::new();
    persistence.expect_save().times(1).returning(|_| Ok(saved(7)));

    let ctx = context(persistence);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();
    let mut form = draft();
    form.set_field("reserver_address_street", "");

    let state = ctx.save_reservation(&mut reservation, &form, &mut feedback).await;
    assert_eq!(state, AttemptState::Committed(7));
}

#[tokio::test]
async fn test_existing_reservation_keeps_id() {
    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .withf(|r: &Reservation| r.id == Some(33))
        .times(1)
        .returning(|r| Ok(saved(r.id.unwrap())));

    let ctx = context(persistence);
    let events = record_events(&ctx);
    let mut reservation = Reservation {
        id: Some(33),
        is_paid: true,
        ..Default::default()
    };
    let mut feedback = FieldFeedback::new();

    let state = ctx.save_reservation(&mut reservation, &draft(), &mut feedback).await;

    assert_eq!(state, AttemptState::Committed(33));
    assert!(reservation.is_paid);
    assert_eq!(*events.lock().unwrap(), vec![AppEvent::ReservationChanged(33)]);
}

#[tokio::test]
async fn test_backend_rejection_is_shown_on_form() {
    let mut errors = FieldErrors::new();
    errors.add("reserver_email_address", "Enter a valid email address.");
    let returned = errors.clone();

    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .times(1)
        .returning(move |_| Err(PersistenceError::Rejected(returned.clone())));

    let ctx = context(persistence);
    let events = record_events(&ctx);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();

    let state = ctx.save_reservation(&mut reservation, &draft(), &mut feedback).await;

    assert_eq!(state, AttemptState::Failed(errors));
    assert!(feedback.is_invalid("reserver_email_address"));
    assert_eq!(
        feedback.message("reserver_email_address"),
        Some("Enter a valid email address.")
    );
    assert_eq!(reservation.id, None);
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_becomes_general_error() {
    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .times(1)
        .returning(|_| Err(PersistenceError::Transport("connection refused".into())));

    let ctx = context(persistence);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();

    let state = ctx.save_reservation(&mut reservation, &draft(), &mut feedback).await;

    assert!(matches!(state, AttemptState::Failed(_)));
    assert_eq!(feedback.message("non_field_errors"), Some("connection refused"));
}

#[tokio::test]
async fn test_disabled_berth_is_not_attached() {
    let mut persistence = MockPersistence::new();
    persistence
        .expect_save()
        .withf(|r: &Reservation| r.berth.is_none())
        .times(1)
        .returning(|_| Ok(saved(8)));

    let ctx = context(persistence);
    let mut reservation = Reservation::default();
    let mut feedback = FieldFeedback::new();
    let mut form = draft();
    form.set_field("resource", "res-b");

    let state = ctx.save_reservation(&mut reservation, &form, &mut feedback).await;
    assert_eq!(state, AttemptState::Committed(8));
}

#[test]
fn test_begin_change_suggests_end_and_flags_inversion() {
    let ctx = context(MockPersistence::new());
    let editor = &ctx.services.reservations;
    let mut feedback = FieldFeedback::new();

    let form = ReservationDraft::from_pairs([
        ("begin", "29.2.2024 12:00"),
        ("end", "1.1.2024 12:00"),
    ])
    .with_required(["begin", "end"]);
    let suggested = editor.on_begin_changed(&form, &mut feedback);

    assert_eq!(suggested.as_deref(), Some("28.2.2025 12:00"));
    assert!(feedback.is_invalid("begin"));
    assert!(feedback.is_invalid("end"));
    assert!(feedback.message("begin").is_some());

    let form = ReservationDraft::from_pairs([
        ("begin", "29.2.2024 12:00"),
        ("end", "28.2.2025 12:00"),
    ])
    .with_required(["begin", "end"]);
    editor.on_end_changed(&form, &mut feedback);
    assert!(feedback.is_clean());
}

#[test]
fn test_selectable_resources_skip_disabled() {
    let ctx = context(MockPersistence::new());
    let options = ctx
        .services
        .reservations
        .selectable_resources(&ctx.catalog, &ctx.units);

    let ids: Vec<&str> = options.iter().map(|o| o.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["res-a", "res-c"]);
    assert_eq!(options[0].unit_name, "Pursilahden venesatama");
    assert_eq!(options[1].name, "Kenttäpaikka 5");
}
