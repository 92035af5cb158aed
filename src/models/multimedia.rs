//! Multimedia model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Document,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Document => write!(f, "document"),
        }
    }
}

/// A media item attached to an event. Replacing the file mutates this row
/// in place; no history is kept for media.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Multimedia {
    pub id: i64,
    pub event_id: i64,
    pub file_url: String,
    pub media_type: MediaType,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMultimediaRequest {
    pub event_id: i64,
    pub file_url: String,
    pub media_type: MediaType,
}

/// Payload for a file replacement
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub original_filename: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}
