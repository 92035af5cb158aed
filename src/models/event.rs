//! Event model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{PedalPlanError, Result};

/// Lifecycle state of an event.
///
/// Transitions only move forward in declaration order: a Draft event may be
/// published directly, a Published event may be cancelled, but no state ever
/// moves back to an earlier one. Purged is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Draft,
    Pending,
    Published,
    Finished,
    Cancelled,
    PendingDeletion,
    Purged,
}

impl EventState {
    fn ordinal(self) -> u8 {
        match self {
            EventState::Draft => 0,
            EventState::Pending => 1,
            EventState::Published => 2,
            EventState::Finished => 3,
            EventState::Cancelled => 4,
            EventState::PendingDeletion => 5,
            EventState::Purged => 6,
        }
    }

    /// Check whether a transition to `next` is allowed
    pub fn can_transition_to(self, next: EventState) -> bool {
        self != EventState::Purged && next.ordinal() > self.ordinal()
    }

    /// Validate a transition, producing the shared error on violation
    pub fn validate_transition(self, next: EventState) -> Result<()> {
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

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Draft => write!(f, "draft"),
            EventState::Pending => write!(f, "pending"),
            EventState::Published => write!(f, "published"),
            EventState::Finished => write!(f, "finished"),
            EventState::Cancelled => write!(f, "cancelled"),
            EventState::PendingDeletion => write!(f, "pending_deletion"),
            EventState::Purged => write!(f, "purged"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub event_type: String,
    pub difficulty: String,
    pub cost: Decimal,
    /// Maximum simultaneously active reservations; 0 means unlimited
    pub max_capacity: i32,
    pub state: EventState,
    pub created_by: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event accepts new reservations
    pub fn is_open_for_reservations(&self) -> bool {
        self.state == EventState::Published
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub event_type: String,
    pub difficulty: String,
    pub cost: Decimal,
    pub max_capacity: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update payload for an event edit.
///
/// `Some` means the field was supplied by the caller; `None` fields are left
/// untouched. Optional columns use a nested `Option` so a supplied `None`
/// can clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub difficulty: Option<String>,
    pub cost: Option<Decimal>,
    pub max_capacity: Option<i32>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

impl EventChanges {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.location.is_none()
            && self.event_type.is_none()
            && self.difficulty.is_none()
            && self.cost.is_none()
            && self.max_capacity.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(EventState::Draft.can_transition_to(EventState::Published));
        assert!(EventState::Published.can_transition_to(EventState::Cancelled));
        assert!(EventState::Published.can_transition_to(EventState::Finished));
        assert!(EventState::Cancelled.can_transition_to(EventState::PendingDeletion));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!EventState::Published.can_transition_to(EventState::Draft));
        assert!(!EventState::Finished.can_transition_to(EventState::Published));
        assert!(!EventState::Purged.can_transition_to(EventState::Draft));
    }

    #[test]
    fn test_purged_is_terminal() {
        for next in [
            EventState::Draft,
            EventState::Pending,
            EventState::Published,
            EventState::Finished,
            EventState::Cancelled,
            EventState::PendingDeletion,
        ] {
            assert!(!EventState::Purged.can_transition_to(next));
        }
    }

    #[test]
    fn test_validate_transition_error_shape() {
        let err = EventState::Published
            .validate_transition(EventState::Draft)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: published -> draft"
        );
    }

    #[test]
    fn test_empty_changes() {
        assert!(EventChanges::default().is_empty());

        let changes = EventChanges {
            location: Some("Rosario".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
