//! Edit audit repository implementation
//!
//! Headers and details are append-only; both inserts run inside the edit
//! transaction so no partial audit state can persist.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::audit::{EditAuditDetail, EditAuditHeader, FieldChange};
use crate::utils::errors::PedalPlanError;

#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the header row for one edit transaction
    pub async fn insert_header_tx(
        &self,
        conn: &mut PgConnection,
        event_id: i64,
        edited_by: i64,
    ) -> Result<EditAuditHeader, PedalPlanError> {
        let header = sqlx::query_as::<_, EditAuditHeader>(
            r#"
            INSERT INTO edit_audit_headers (event_id, edited_by, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, edited_by, created_at
            "#,
        )
        .bind(event_id)
        .bind(edited_by)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(header)
    }

    /// Insert one field-level detail row under a header
    pub async fn insert_detail_tx(
        &self,
        conn: &mut PgConnection,
        header_id: i64,
        change: &FieldChange,
    ) -> Result<EditAuditDetail, PedalPlanError> {
        let detail = sqlx::query_as::<_, EditAuditDetail>(
            r#"
            INSERT INTO edit_audit_details (header_id, field_name, old_value, new_value)
            VALUES ($1, $2, $3, $4)
            RETURNING id, header_id, field_name, old_value, new_value
            "#,
        )
        .bind(header_id)
        .bind(&change.field_name)
        .bind(&change.old_value)
        .bind(&change.new_value)
        .fetch_one(&mut *conn)
        .await?;

        Ok(detail)
    }

    /// Get audit headers for an event, newest first
    pub async fn list_headers(
        &self,
        event_id: i64,
    ) -> Result<Vec<EditAuditHeader>, PedalPlanError> {
        let headers = sqlx::query_as::<_, EditAuditHeader>(
            "SELECT id, event_id, edited_by, created_at FROM edit_audit_headers WHERE event_id = $1 ORDER BY created_at DESC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(headers)
    }

    /// Get detail rows for a header
    pub async fn list_details(
        &self,
        header_id: i64,
    ) -> Result<Vec<EditAuditDetail>, PedalPlanError> {
        let details = sqlx::query_as::<_, EditAuditDetail>(
            "SELECT id, header_id, field_name, old_value, new_value FROM edit_audit_details WHERE header_id = $1 ORDER BY id ASC",
        )
        .bind(header_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }
}
