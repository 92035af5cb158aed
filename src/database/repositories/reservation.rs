//! Reservation repository implementation
//!
//! Write-path methods that participate in the capacity-guarded transaction
//! take a caller-owned connection; read paths go straight to the pool.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::reservation::{Reservation, ReservationState};
use crate::utils::errors::PedalPlanError;

const RESERVATION_COLUMNS: &str = "id, event_id, user_id, state, created_at, expires_at";

#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reservation inside a caller-owned transaction
    pub async fn insert_tx(
        &self,
        conn: &mut PgConnection,
        event_id: i64,
        user_id: i64,
        state: ReservationState,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Reservation, PedalPlanError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (event_id, user_id, state, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(state)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(reservation)
    }

    /// Find the active (pending or confirmed) reservation for a user on an
    /// event, inside a caller-owned transaction
    pub async fn find_active_tx(
        &self,
        conn: &mut PgConnection,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<Reservation>, PedalPlanError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE event_id = $1 AND user_id = $2 AND state IN ('pending', 'confirmed')"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(reservation)
    }

    /// Count active reservations for an event, inside a caller-owned
    /// transaction. Must run after the event row lock is held so the count
    /// is stable for the capacity check.
    pub async fn count_active_tx(
        &self,
        conn: &mut PgConnection,
        event_id: i64,
    ) -> Result<i64, PedalPlanError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations WHERE event_id = $1 AND state IN ('pending', 'confirmed')",
        )
        .bind(event_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.0)
    }

    /// Find reservation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, PedalPlanError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Count active reservations for an event (read side)
    pub async fn count_active(&self, event_id: i64) -> Result<i64, PedalPlanError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations WHERE event_id = $1 AND state IN ('pending', 'confirmed')",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Update reservation state, guarded on the state the caller observed
    /// (soft-delete and payment transitions). Returns None when the row no
    /// longer holds `from`, so a concurrent transition is never overwritten
    /// and terminal states stay terminal.
    pub async fn update_state(
        &self,
        id: i64,
        from: ReservationState,
        to: ReservationState,
    ) -> Result<Option<Reservation>, PedalPlanError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET state = $2
            WHERE id = $1 AND state = $3
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(to)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Move every overdue pending reservation to expired; returns the number
    /// of rows affected. The stored deadline is only a value the sweep reads.
    pub async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, PedalPlanError> {
        let result = sqlx::query(
            "UPDATE reservations SET state = 'expired' WHERE state = 'pending' AND expires_at IS NOT NULL AND expires_at < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Get reservations for an event
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Reservation>, PedalPlanError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE event_id = $1 ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Get reservations made by a user
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>, PedalPlanError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}
