//! Event edit service implementation
//!
//! Detects field-level diffs on event updates and persists the master/detail
//! audit trail. The diff itself is a pure function over the stored event and
//! the proposed partial changes; persistence happens in one transaction so
//! the header, its detail rows and the applied values commit together or not
//! at all.

use chrono::Utc;
use tracing::info;

use crate::database::service::DatabaseService;
use crate::database::DatabasePool;
use crate::models::audit::{EditAuditEntry, FieldChange};
use crate::models::event::{CreateEventRequest, Event, EventChanges, EventState};
use crate::models::user::Actor;
use crate::services::auth::{AuthService, Permission};
use crate::utils::errors::{PedalPlanError, Result};
use crate::utils::logging;

/// Compare the proposed partial changes against the stored event and return
/// one record per field whose string representation actually differs.
/// Absent fields are never reported; supplying a field with its current
/// value is a no-op.
pub fn detect_changes(event: &Event, changes: &EventChanges) -> Vec<FieldChange> {
    let mut detected = Vec::new();

    if let Some(ref name) = changes.name {
        push_if_changed(&mut detected, "name", &event.name, name);
    }
    if let Some(ref description) = changes.description {
        push_if_changed(
            &mut detected,
            "description",
            &opt_string(&event.description),
            &opt_string(description),
        );
    }
    if let Some(event_date) = changes.event_date {
        push_if_changed(
            &mut detected,
            "event_date",
            &event.event_date.to_rfc3339(),
            &event_date.to_rfc3339(),
        );
    }
    if let Some(ref location) = changes.location {
        push_if_changed(&mut detected, "location", &event.location, location);
    }
    if let Some(ref event_type) = changes.event_type {
        push_if_changed(&mut detected, "event_type", &event.event_type, event_type);
    }
    if let Some(ref difficulty) = changes.difficulty {
        push_if_changed(&mut detected, "difficulty", &event.difficulty, difficulty);
    }
    if let Some(cost) = changes.cost {
        push_if_changed(&mut detected, "cost", &event.cost.to_string(), &cost.to_string());
    }
    if let Some(max_capacity) = changes.max_capacity {
        push_if_changed(
            &mut detected,
            "max_capacity",
            &event.max_capacity.to_string(),
            &max_capacity.to_string(),
        );
    }
    if let Some(latitude) = changes.latitude {
        push_if_changed(
            &mut detected,
            "latitude",
            &opt_string(&event.latitude),
            &opt_string(&latitude),
        );
    }
    if let Some(longitude) = changes.longitude {
        push_if_changed(
            &mut detected,
            "longitude",
            &opt_string(&event.longitude),
            &opt_string(&longitude),
        );
    }

    detected
}

fn push_if_changed(
    detected: &mut Vec<FieldChange>,
    field_name: &str,
    old_value: &impl ToString,
    new_value: &impl ToString,
) {
    let old_value = old_value.to_string();
    let new_value = new_value.to_string();
    if old_value != new_value {
        detected.push(FieldChange::new(field_name, old_value, new_value));
    }
}

fn opt_string<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[derive(Clone)]
pub struct EventEditService {
    pool: DatabasePool,
    db: DatabaseService,
    auth: AuthService,
}

impl EventEditService {
    /// Create a new EventEditService instance
    pub fn new(pool: DatabasePool, db: DatabaseService, auth: AuthService) -> Self {
        Self { pool, db, auth }
    }

    /// Register a new event. Privileged actors publish immediately; plain
    /// organizers start in Draft.
    pub async fn create_event(&self, request: CreateEventRequest, actor: Actor) -> Result<Event> {
        self.auth.require_permission(actor, Permission::Organizer)?;

        if request.max_capacity < 0 {
            return Err(PedalPlanError::BusinessRule(
                "Max capacity cannot be negative".to_string(),
            ));
        }

        let initial_state = if self.auth.is_privileged(actor) {
            EventState::Published
        } else {
            EventState::Draft
        };

        let event = self.db.events.create(request, actor.user_id, initial_state).await?;
        info!(
            event_id = event.id,
            created_by = actor.user_id,
            state = %event.state,
            "Event created"
        );
        Ok(event)
    }

    /// Apply a partial update to an event, recording an audit header with
    /// one detail row per changed field. A no-op edit returns the event
    /// unmodified and writes nothing.
    pub async fn edit_event(
        &self,
        event_id: i64,
        changes: EventChanges,
        actor: Actor,
    ) -> Result<Event> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(PedalPlanError::EventNotFound { event_id })?;

        self.auth.require_owner(actor, event.created_by, "event")?;

        if event.event_date < Utc::now() {
            return Err(PedalPlanError::BusinessRule(
                "Cannot edit an event whose date has already passed".to_string(),
            ));
        }

        let detected = detect_changes(&event, &changes);
        if detected.is_empty() {
            return Ok(event);
        }

        let mut tx = self.pool.begin().await?;

        let header = self
            .db
            .audit
            .insert_header_tx(&mut tx, event_id, actor.user_id)
            .await?;
        for change in &detected {
            self.db
                .audit
                .insert_detail_tx(&mut tx, header.id, change)
                .await?;
        }
        let updated = self.db.events.apply_changes(&mut tx, event_id, &changes).await?;

        tx.commit().await?;

        logging::log_audit_entry(event_id, actor.user_id, detected.len());
        Ok(updated)
    }

    /// Get the edit history of an event, newest first
    pub async fn get_edit_history(&self, event_id: i64) -> Result<Vec<EditAuditEntry>> {
        let headers = self.db.audit.list_headers(event_id).await?;

        let mut entries = Vec::with_capacity(headers.len());
        for header in headers {
            let details = self.db.audit.list_details(header.id).await?;
            entries.push(EditAuditEntry { header, details });
        }

        Ok(entries)
    }
}
