//! Event repository implementation

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::event::{CreateEventRequest, Event, EventChanges, EventState};
use crate::utils::errors::PedalPlanError;

const EVENT_COLUMNS: &str = "id, name, description, event_date, location, event_type, difficulty, cost, max_capacity, state, created_by, latitude, longitude, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(
        &self,
        request: CreateEventRequest,
        created_by: i64,
        state: EventState,
    ) -> Result<Event, PedalPlanError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, description, event_date, location, event_type, difficulty, cost, max_capacity, state, created_by, latitude, longitude, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.event_date)
        .bind(request.location)
        .bind(request.event_type)
        .bind(request.difficulty)
        .bind(request.cost)
        .bind(request.max_capacity)
        .bind(state)
        .bind(created_by)
        .bind(request.latitude)
        .bind(request.longitude)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, PedalPlanError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID with a row lock, inside a caller-owned transaction.
    /// Serializes concurrent reservation attempts for the same event.
    pub async fn find_by_id_for_update(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Event>, PedalPlanError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(event)
    }

    /// Apply a partial update to the event row, inside a caller-owned
    /// transaction. Supplied optional fields may also clear a stored value,
    /// so each nullable column carries an explicit "was supplied" flag.
    pub async fn apply_changes(
        &self,
        conn: &mut PgConnection,
        id: i64,
        changes: &EventChanges,
    ) -> Result<Event, PedalPlanError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                event_date = COALESCE($5, event_date),
                location = COALESCE($6, location),
                event_type = COALESCE($7, event_type),
                difficulty = COALESCE($8, difficulty),
                cost = COALESCE($9, cost),
                max_capacity = COALESCE($10, max_capacity),
                latitude = CASE WHEN $11 THEN $12 ELSE latitude END,
                longitude = CASE WHEN $13 THEN $14 ELSE longitude END,
                updated_at = $15
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name.clone())
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.event_date)
        .bind(changes.location.clone())
        .bind(changes.event_type.clone())
        .bind(changes.difficulty.clone())
        .bind(changes.cost)
        .bind(changes.max_capacity)
        .bind(changes.latitude.is_some())
        .bind(changes.latitude.flatten())
        .bind(changes.longitude.is_some())
        .bind(changes.longitude.flatten())
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(event)
    }

    /// Update event state
    pub async fn update_state(
        &self,
        id: i64,
        state: EventState,
    ) -> Result<Event, PedalPlanError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET state = $2, updated_at = $3
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(state)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Get upcoming published events
    pub async fn list_published(&self, limit: Option<i64>) -> Result<Vec<Event>, PedalPlanError> {
        let limit = limit.unwrap_or(50);
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE state = 'published' AND event_date > NOW() ORDER BY event_date ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events created by an organizer
    pub async fn list_for_organizer(&self, user_id: i64) -> Result<Vec<Event>, PedalPlanError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1 ORDER BY event_date ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
