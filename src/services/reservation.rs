//! Reservation service implementation
//!
//! The reservation lifecycle engine: creation with capacity accounting,
//! payment confirmation (manual and webhook paths), and soft-delete
//! cancellation. The capacity and uniqueness checks run inside one
//! transaction holding the event row lock, so the database serializes the
//! race to the last seat; the partial unique index backs the uniqueness
//! invariant as well.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::database::service::DatabaseService;
use crate::database::DatabasePool;
use crate::models::event::Event;
use crate::models::reservation::{initial_disposition, Reservation, ReservationState};
use crate::models::user::Actor;
use crate::services::auth::AuthService;
use crate::services::capacity::{self, Occupancy};
use crate::services::notification::NotificationService;
use crate::utils::errors::{PedalPlanError, Result};
use crate::utils::logging;

#[derive(Clone)]
pub struct ReservationService {
    pool: DatabasePool,
    db: DatabaseService,
    auth: AuthService,
    notifications: NotificationService,
}

impl ReservationService {
    /// Create a new ReservationService instance
    pub fn new(
        pool: DatabasePool,
        db: DatabaseService,
        auth: AuthService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            db,
            auth,
            notifications,
        }
    }

    /// Reserve a spot on an event for the acting user.
    ///
    /// Free events confirm immediately; paid events start Pending with a
    /// 72-hour payment deadline. The confirmation notification is dispatched
    /// after commit and never blocks or fails the reservation.
    pub async fn create_reservation(&self, event_id: i64, actor: Actor) -> Result<Reservation> {
        let mut tx = self.pool.begin().await?;

        let event = self
            .db
            .events
            .find_by_id_for_update(&mut tx, event_id)
            .await?
            .ok_or(PedalPlanError::EventNotFound { event_id })?;

        if !event.is_open_for_reservations() {
            return Err(PedalPlanError::BusinessRule(format!(
                "Event {} is not open for reservations (state: {})",
                event_id, event.state
            )));
        }

        if let Some(existing) = self
            .db
            .reservations
            .find_active_tx(&mut tx, event_id, actor.user_id)
            .await?
        {
            return Err(PedalPlanError::DuplicateReservation {
                existing_state: existing.state,
            });
        }

        if event.max_capacity > 0 {
            let active_count = self.db.reservations.count_active_tx(&mut tx, event_id).await?;
            if !capacity::has_capacity(event.max_capacity, active_count) {
                return Err(PedalPlanError::CapacityExceeded { event_id });
            }
        }

        let now = Utc::now();
        let (state, expires_at) = initial_disposition(event.cost, now);
        let reservation = self
            .db
            .reservations
            .insert_tx(&mut tx, event_id, actor.user_id, state, now, expires_at)
            .await?;

        tx.commit().await?;

        logging::log_reservation_action(reservation.id, event_id, actor.user_id, "created");
        self.spawn_notification(event, reservation.clone(), NotificationKind::Confirmation);

        Ok(reservation)
    }

    /// Manually confirm payment for a reservation. Restricted to
    /// administrators and supervisors.
    pub async fn confirm_payment(&self, reservation_id: i64, actor: Actor) -> Result<Reservation> {
        if !self.auth.can_confirm_payment(actor) {
            return Err(PedalPlanError::PermissionDenied(format!(
                "User {} may not confirm payments",
                actor.user_id
            )));
        }

        let reservation = self
            .db
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(PedalPlanError::ReservationNotFound { reservation_id })?;

        if reservation.state == ReservationState::Confirmed {
            return Err(PedalPlanError::AlreadyConfirmed { reservation_id });
        }

        let updated = match self
            .transition(&reservation, ReservationState::Confirmed)
            .await?
        {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::Conflict(current) => {
                if current.state == ReservationState::Confirmed {
                    return Err(PedalPlanError::AlreadyConfirmed { reservation_id });
                }
                return Err(PedalPlanError::InvalidStateTransition {
                    from: current.state.to_string(),
                    to: ReservationState::Confirmed.to_string(),
                });
            }
        };

        logging::log_reservation_action(
            reservation_id,
            updated.event_id,
            actor.user_id,
            "payment_confirmed",
        );
        logging::log_admin_action(
            actor.user_id,
            "payment_confirmed",
            Some(&reservation_id.to_string()),
        );
        Ok(updated)
    }

    /// Confirm payment from the automated payment-webhook path. No role
    /// check; idempotent for reservations that are already confirmed.
    pub async fn confirm_payment_webhook(&self, reservation_id: i64) -> Result<Reservation> {
        let reservation = self
            .db
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(PedalPlanError::ReservationNotFound { reservation_id })?;

        if reservation.state == ReservationState::Confirmed {
            info!(
                reservation_id = reservation_id,
                "Webhook confirmation re-applied to confirmed reservation"
            );
            return Ok(reservation);
        }

        let updated = match self
            .transition(&reservation, ReservationState::Confirmed)
            .await?
        {
            TransitionOutcome::Applied(updated) => updated,
            // A gateway retry racing itself lands here; confirmed is what the
            // webhook wanted, anything else lost to a cancel or the sweep.
            TransitionOutcome::Conflict(current) => {
                if current.state == ReservationState::Confirmed {
                    return Ok(current);
                }
                return Err(PedalPlanError::InvalidStateTransition {
                    from: current.state.to_string(),
                    to: ReservationState::Confirmed.to_string(),
                });
            }
        };

        logging::log_reservation_action(
            reservation_id,
            updated.event_id,
            updated.user_id,
            "payment_confirmed_webhook",
        );
        Ok(updated)
    }

    /// Cancel a reservation. Allowed for the owner and for privileged roles.
    /// Soft-delete: the row stays, the state moves to Cancelled.
    pub async fn cancel_reservation(&self, reservation_id: i64, actor: Actor) -> Result<Reservation> {
        let reservation = self
            .db
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(PedalPlanError::ReservationNotFound { reservation_id })?;

        if !self.auth.can_cancel_reservation(actor, reservation.user_id) {
            return Err(PedalPlanError::PermissionDenied(format!(
                "User {} may not cancel reservation {}",
                actor.user_id, reservation_id
            )));
        }

        let updated = match self
            .transition(&reservation, ReservationState::Cancelled)
            .await?
        {
            TransitionOutcome::Applied(updated) => updated,
            TransitionOutcome::Conflict(current) => {
                return Err(PedalPlanError::InvalidStateTransition {
                    from: current.state.to_string(),
                    to: ReservationState::Cancelled.to_string(),
                });
            }
        };

        logging::log_reservation_action(
            reservation_id,
            updated.event_id,
            actor.user_id,
            "cancelled",
        );

        match self.db.events.find_by_id(updated.event_id).await {
            Ok(Some(event)) => {
                self.spawn_notification(event, updated.clone(), NotificationKind::Cancellation)
            }
            Ok(None) => warn!(
                event_id = updated.event_id,
                "Event missing for cancellation notice"
            ),
            Err(e) => error!(error = %e, "Failed to load event for cancellation notice"),
        }

        Ok(updated)
    }

    /// Occupancy snapshot for read-side listings. Availability is clamped
    /// to zero here; only the write path treats over-capacity as an error.
    pub async fn get_occupancy(&self, event_id: i64) -> Result<Occupancy> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(PedalPlanError::EventNotFound { event_id })?;

        let active_count = self.db.reservations.count_active(event_id).await?;
        Ok(Occupancy::new(event.max_capacity, active_count))
    }

    /// Get reservations made by a user
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>> {
        self.db.reservations.list_for_user(user_id).await
    }

    /// Apply a state change guarded on the state the caller observed. The
    /// update only matches a row still in that state, so when a concurrent
    /// transition won the race the guard misses and the current row is
    /// returned for the caller to report the conflict its own way.
    async fn transition(
        &self,
        reservation: &Reservation,
        to: ReservationState,
    ) -> Result<TransitionOutcome> {
        reservation.state.validate_transition(to)?;

        match self
            .db
            .reservations
            .update_state(reservation.id, reservation.state, to)
            .await?
        {
            Some(updated) => Ok(TransitionOutcome::Applied(updated)),
            None => {
                let current = self
                    .db
                    .reservations
                    .find_by_id(reservation.id)
                    .await?
                    .ok_or(PedalPlanError::ReservationNotFound {
                        reservation_id: reservation.id,
                    })?;
                warn!(
                    reservation_id = reservation.id,
                    observed = %reservation.state,
                    current = %current.state,
                    "Reservation state changed concurrently, transition not applied"
                );
                Ok(TransitionOutcome::Conflict(current))
            }
        }
    }

    /// Dispatch a notification out-of-band; delivery failures are logged
    /// and swallowed here.
    fn spawn_notification(&self, event: Event, reservation: Reservation, kind: NotificationKind) {
        let users = self.db.users.clone();
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            let user = match users.find_by_id(reservation.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!(
                        user_id = reservation.user_id,
                        "Recipient missing, skipping notification"
                    );
                    return;
                }
                Err(e) => {
                    error!(error = %e, "Failed to load recipient for notification");
                    return;
                }
            };

            let result = match kind {
                NotificationKind::Confirmation => {
                    notifications
                        .send_reservation_confirmation(&user, &event, &reservation)
                        .await
                }
                NotificationKind::Cancellation => {
                    notifications
                        .send_cancellation_notice(&user, &event, &reservation)
                        .await
                }
            };

            if let Err(e) = result {
                logging::log_notification_failure("email", &user.email, &e.to_string());
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum NotificationKind {
    Confirmation,
    Cancellation,
}

/// Result of a guarded state update
enum TransitionOutcome {
    /// The row still held the observed state and was updated
    Applied(Reservation),
    /// A concurrent transition got there first; holds the current row
    Conflict(Reservation),
}
