//! Reservation model and lifecycle rules

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{PedalPlanError, Result};

/// Hours a paid reservation stays Pending before the sweep may expire it
pub const RESERVATION_TTL_HOURS: i64 = 72;

/// State of a reservation.
///
/// Pending moves to Confirmed, Cancelled or Expired; Confirmed may still be
/// cancelled; Cancelled and Expired are terminal. Rows are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

impl ReservationState {
    /// Whether the state counts against event capacity
    pub fn is_active(self) -> bool {
        matches!(self, ReservationState::Pending | ReservationState::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationState::Cancelled | ReservationState::Expired)
    }

    /// Check whether a transition to `next` is allowed
    pub fn can_transition_to(self, next: ReservationState) -> bool {
        match (self, next) {
            (ReservationState::Pending, ReservationState::Confirmed)
            | (ReservationState::Pending, ReservationState::Cancelled)
            | (ReservationState::Pending, ReservationState::Expired)
            | (ReservationState::Confirmed, ReservationState::Cancelled) => true,
            _ => false,
        }
    }

    /// Validate a transition, producing the shared error on violation
    pub fn validate_transition(self, next: ReservationState) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(PedalPlanError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationState::Pending => write!(f, "pending"),
            ReservationState::Confirmed => write!(f, "confirmed"),
            ReservationState::Cancelled => write!(f, "cancelled"),
            ReservationState::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub state: ReservationState,
    pub created_at: DateTime<Utc>,
    /// Payment deadline; set only while a paid reservation is Pending.
    /// The expiration sweep is authoritative for the Pending -> Expired move.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Determine the initial state and payment deadline for a new reservation.
///
/// Free events confirm immediately with no deadline; paid events start
/// Pending with a deadline 72 hours after creation.
pub fn initial_disposition(
    cost: Decimal,
    created_at: DateTime<Utc>,
) -> (ReservationState, Option<DateTime<Utc>>) {
    if cost.is_zero() {
        (ReservationState::Confirmed, None)
    } else {
        (
            ReservationState::Pending,
            Some(created_at + Duration::hours(RESERVATION_TTL_HOURS)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_event_confirms_immediately() {
        let now = Utc::now();
        let (state, expires_at) = initial_disposition(Decimal::ZERO, now);
        assert_eq!(state, ReservationState::Confirmed);
        assert!(expires_at.is_none());
    }

    #[test]
    fn test_paid_event_pending_with_72h_deadline() {
        let now = Utc::now();
        let (state, expires_at) = initial_disposition(Decimal::new(2000, 2), now);
        assert_eq!(state, ReservationState::Pending);
        assert_eq!(expires_at, Some(now + Duration::hours(72)));
    }

    #[test]
    fn test_pending_transitions() {
        assert!(ReservationState::Pending.can_transition_to(ReservationState::Confirmed));
        assert!(ReservationState::Pending.can_transition_to(ReservationState::Cancelled));
        assert!(ReservationState::Pending.can_transition_to(ReservationState::Expired));
    }

    #[test]
    fn test_confirmed_only_cancellable() {
        assert!(ReservationState::Confirmed.can_transition_to(ReservationState::Cancelled));
        assert!(!ReservationState::Confirmed.can_transition_to(ReservationState::Pending));
        assert!(!ReservationState::Confirmed.can_transition_to(ReservationState::Expired));
    }

    #[test]
    fn test_terminal_states() {
        for terminal in [ReservationState::Cancelled, ReservationState::Expired] {
            assert!(terminal.is_terminal());
            for next in [
                ReservationState::Pending,
                ReservationState::Confirmed,
                ReservationState::Cancelled,
                ReservationState::Expired,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_active_states_count_against_capacity() {
        assert!(ReservationState::Pending.is_active());
        assert!(ReservationState::Confirmed.is_active());
        assert!(!ReservationState::Cancelled.is_active());
        assert!(!ReservationState::Expired.is_active());
    }
}
