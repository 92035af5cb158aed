//! Multimedia repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::multimedia::{CreateMultimediaRequest, MediaType, Multimedia};
use crate::utils::errors::PedalPlanError;

#[derive(Debug, Clone)]
pub struct MultimediaRepository {
    pool: PgPool,
}

impl MultimediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a media item for an event
    pub async fn create(
        &self,
        request: CreateMultimediaRequest,
    ) -> Result<Multimedia, PedalPlanError> {
        let multimedia = sqlx::query_as::<_, Multimedia>(
            r#"
            INSERT INTO multimedia (event_id, file_url, media_type, uploaded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, file_url, media_type, uploaded_at
            "#,
        )
        .bind(request.event_id)
        .bind(request.file_url)
        .bind(request.media_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(multimedia)
    }

    /// Find media item by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Multimedia>, PedalPlanError> {
        let multimedia = sqlx::query_as::<_, Multimedia>(
            "SELECT id, event_id, file_url, media_type, uploaded_at FROM multimedia WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(multimedia)
    }

    /// Overwrite the URL and type of an existing media row (no history)
    pub async fn update_file(
        &self,
        id: i64,
        file_url: &str,
        media_type: MediaType,
    ) -> Result<Multimedia, PedalPlanError> {
        let multimedia = sqlx::query_as::<_, Multimedia>(
            r#"
            UPDATE multimedia
            SET file_url = $2, media_type = $3, uploaded_at = $4
            WHERE id = $1
            RETURNING id, event_id, file_url, media_type, uploaded_at
            "#,
        )
        .bind(id)
        .bind(file_url)
        .bind(media_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(multimedia)
    }

    /// Get media items for an event
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Multimedia>, PedalPlanError> {
        let items = sqlx::query_as::<_, Multimedia>(
            "SELECT id, event_id, file_url, media_type, uploaded_at FROM multimedia WHERE event_id = $1 ORDER BY uploaded_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
