//! Edit audit trail models (master/detail)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One edit transaction on an event. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EditAuditHeader {
    pub id: i64,
    pub event_id: i64,
    pub edited_by: i64,
    pub created_at: DateTime<Utc>,
}

/// One field-level change belonging to a header row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EditAuditDetail {
    pub id: i64,
    pub header_id: i64,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
}

/// A detected field-level change, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
}

impl FieldChange {
    pub fn new(field_name: &str, old_value: String, new_value: String) -> Self {
        Self {
            field_name: field_name.to_string(),
            old_value,
            new_value,
        }
    }
}

/// An audit header together with its detail rows, for history listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditAuditEntry {
    pub header: EditAuditHeader,
    pub details: Vec<EditAuditDetail>,
}
