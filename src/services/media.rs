//! Media service implementation
//!
//! Replaces the physical file behind a multimedia row. The storage path is
//! derived from the multimedia id, so a replacement overwrites the previous
//! file in place and no history is kept.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::settings::Settings;
use crate::database::service::DatabaseService;
use crate::models::multimedia::{MediaUpload, Multimedia};
use crate::utils::errors::{PedalPlanError, Result};
use crate::utils::helpers::{file_extension, sanitize_filename};

const DEFAULT_EXTENSION: &str = "bin";

/// Deterministic on-disk location for a multimedia item
pub fn storage_path(media_dir: &Path, multimedia_id: i64, extension: &str) -> PathBuf {
    media_dir.join(format!("{}.{}", multimedia_id, extension))
}

/// Public URL for a multimedia item
pub fn public_url(base_url: &str, multimedia_id: i64, extension: &str) -> String {
    format!(
        "{}/{}.{}",
        base_url.trim_end_matches('/'),
        multimedia_id,
        extension
    )
}

#[derive(Clone)]
pub struct MediaService {
    db: DatabaseService,
    settings: Settings,
}

impl MediaService {
    /// Create a new MediaService instance
    pub fn new(db: DatabaseService, settings: Settings) -> Self {
        Self { db, settings }
    }

    /// Replace the file behind an existing multimedia row. The payload is
    /// written to the id-derived path, overwriting whatever was there, and
    /// the row's URL and type are updated to match.
    pub async fn replace_file(
        &self,
        multimedia_id: i64,
        upload: MediaUpload,
    ) -> Result<Multimedia> {
        if !self.settings.features.media_library {
            return Err(PedalPlanError::BusinessRule(
                "Media library is disabled".to_string(),
            ));
        }

        self.db
            .multimedia
            .find_by_id(multimedia_id)
            .await?
            .ok_or(PedalPlanError::MultimediaNotFound { multimedia_id })?;

        let extension = file_extension(&sanitize_filename(&upload.original_filename))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        let media_dir = PathBuf::from(&self.settings.storage.media_dir);
        let path = storage_path(&media_dir, multimedia_id, &extension);

        tokio::fs::create_dir_all(&media_dir).await?;
        tokio::fs::write(&path, &upload.bytes).await?;

        let url = public_url(&self.settings.storage.public_base_url, multimedia_id, &extension);
        let updated = self
            .db
            .multimedia
            .update_file(multimedia_id, &url, upload.media_type)
            .await?;

        info!(
            multimedia_id = multimedia_id,
            path = %path.display(),
            "Media file replaced"
        );
        Ok(updated)
    }

    /// Get media items for an event
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Multimedia>> {
        self.db.multimedia.list_for_event(event_id).await
    }
}
