//! Business-rule tests for the reservation and edit engines.
//!
//! These exercise the pure pieces of the core through the library API:
//! initial reservation disposition, capacity accounting, state machines and
//! field-level diff detection. Persistence-backed flows compose these same
//! functions around the transaction boundary.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use PedalPlan::models::{
    initial_disposition, Event, EventChanges, EventState, ReservationState,
    RESERVATION_TTL_HOURS,
};
use PedalPlan::services::{detect_changes, has_capacity, Occupancy};
use PedalPlan::PedalPlanError;

fn fixture_event(cost: Decimal, max_capacity: i32) -> Event {
    let date = Utc.with_ymd_and_hms(2027, 3, 14, 9, 0, 0).unwrap();
    Event {
        id: 1,
        name: "Gran Fondo Sierras".to_string(),
        description: Some("120km por las altas cumbres".to_string()),
        event_date: date,
        location: "Cordoba".to_string(),
        event_type: "ruta".to_string(),
        difficulty: "alta".to_string(),
        cost,
        max_capacity,
        state: EventState::Published,
        created_by: 10,
        latitude: Some(-31.42),
        longitude: Some(-64.18),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn free_event_reservation_confirms_without_deadline() {
    let now = Utc::now();
    let (state, expires_at) = initial_disposition(Decimal::ZERO, now);

    assert_eq!(state, ReservationState::Confirmed);
    assert_eq!(expires_at, None);
}

#[test]
fn paid_event_reservation_pends_with_exact_deadline() {
    let now = Utc::now();
    let (state, expires_at) = initial_disposition(Decimal::new(2000, 2), now);

    assert_eq!(state, ReservationState::Pending);
    assert_eq!(expires_at, Some(now + Duration::hours(RESERVATION_TTL_HOURS)));
}

#[test]
fn last_seat_rejects_the_second_taker() {
    // Event with a single seat: the first active reservation fills it
    let event = fixture_event(Decimal::ZERO, 1);

    assert!(has_capacity(event.max_capacity, 0));
    assert!(!has_capacity(event.max_capacity, 1));
}

#[test]
fn cancelled_reservation_frees_the_pair_for_a_new_one() {
    // Cancellation is a terminal soft-delete; the state no longer counts as
    // active, so a second reservation for the same (event, user) pair is
    // permitted again.
    assert!(ReservationState::Pending.can_transition_to(ReservationState::Cancelled));
    assert!(!ReservationState::Cancelled.is_active());
    assert!(ReservationState::Cancelled.is_terminal());
}

#[test]
fn confirmed_reservation_survives_everything_but_cancellation() {
    assert!(ReservationState::Confirmed.can_transition_to(ReservationState::Cancelled));
    assert!(!ReservationState::Confirmed.can_transition_to(ReservationState::Expired));
    assert!(!ReservationState::Confirmed.can_transition_to(ReservationState::Pending));
}

#[test]
fn occupancy_clamps_over_capacity_for_display() {
    // Over-capacity can only come from a historical race; listings show zero
    let occupancy = Occupancy::new(2, 4);
    assert_eq!(occupancy.available, 0);
    assert_eq!(occupancy.active_count, 4);
}

#[test]
fn location_change_yields_exactly_one_audit_record() {
    let event = fixture_event(Decimal::ZERO, 30);
    let changes = EventChanges {
        location: Some("Rosario".to_string()),
        ..Default::default()
    };

    let detected = detect_changes(&event, &changes);
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].field_name, "location");
    assert_eq!(detected[0].old_value, "Cordoba");
    assert_eq!(detected[0].new_value, "Rosario");
}

#[test]
fn identical_payload_detects_nothing() {
    let event = fixture_event(Decimal::new(1500, 2), 30);
    let changes = EventChanges {
        name: Some(event.name.clone()),
        location: Some(event.location.clone()),
        cost: Some(event.cost),
        max_capacity: Some(event.max_capacity),
        ..Default::default()
    };

    assert!(detect_changes(&event, &changes).is_empty());
}

#[test]
fn duplicate_reservation_error_names_the_existing_state() {
    let err = PedalPlanError::DuplicateReservation {
        existing_state: ReservationState::Pending,
    };
    assert_matches!(
        err,
        PedalPlanError::DuplicateReservation {
            existing_state: ReservationState::Pending
        }
    );
    assert!(err.to_string().contains("pending"));
}

#[test]
fn event_lifecycle_moves_forward_only() {
    assert!(EventState::Draft.can_transition_to(EventState::Published));
    assert!(EventState::Published.can_transition_to(EventState::Cancelled));
    assert!(!EventState::Published.can_transition_to(EventState::Draft));
    assert!(!EventState::Cancelled.can_transition_to(EventState::Published));

    let err = EventState::Finished
        .validate_transition(EventState::Published)
        .unwrap_err();
    assert_matches!(err, PedalPlanError::InvalidStateTransition { .. });
}
