//! Error handling for PedalPlan
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

use crate::models::reservation::ReservationState;

/// Main error type for PedalPlan application
#[derive(Error, Debug)]
pub enum PedalPlanError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Reservation not found: {reservation_id}")]
    ReservationNotFound { reservation_id: i64 },

    #[error("Multimedia not found: {multimedia_id}")]
    MultimediaNotFound { multimedia_id: i64 },

    #[error("User already holds a {existing_state} reservation for this event")]
    DuplicateReservation { existing_state: ReservationState },

    #[error("Event {event_id} has no remaining capacity")]
    CapacityExceeded { event_id: i64 },

    #[error("Reservation {reservation_id} is already confirmed")]
    AlreadyConfirmed { reservation_id: i64 },

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PedalPlan operations
pub type Result<T> = std::result::Result<T, PedalPlanError>;

impl PedalPlanError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PedalPlanError::Database(_) => false,
            PedalPlanError::Migration(_) => false,
            PedalPlanError::Config(_) => false,
            PedalPlanError::PermissionDenied(_) => false,
            PedalPlanError::UserNotFound { .. } => false,
            PedalPlanError::EventNotFound { .. } => false,
            PedalPlanError::ReservationNotFound { .. } => false,
            PedalPlanError::MultimediaNotFound { .. } => false,
            PedalPlanError::DuplicateReservation { .. } => false,
            PedalPlanError::CapacityExceeded { .. } => false,
            PedalPlanError::AlreadyConfirmed { .. } => false,
            PedalPlanError::BusinessRule(_) => false,
            PedalPlanError::InvalidStateTransition { .. } => false,
            PedalPlanError::Http(_) => true,
            PedalPlanError::Serialization(_) => false,
            PedalPlanError::Io(_) => true,
            PedalPlanError::UrlParse(_) => false,
            PedalPlanError::Internal(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PedalPlanError::Database(_) => ErrorSeverity::Critical,
            PedalPlanError::Migration(_) => ErrorSeverity::Critical,
            PedalPlanError::Config(_) => ErrorSeverity::Critical,
            PedalPlanError::Internal(_) => ErrorSeverity::Critical,
            PedalPlanError::PermissionDenied(_) => ErrorSeverity::Warning,
            PedalPlanError::DuplicateReservation { .. } => ErrorSeverity::Info,
            PedalPlanError::CapacityExceeded { .. } => ErrorSeverity::Info,
            PedalPlanError::AlreadyConfirmed { .. } => ErrorSeverity::Info,
            PedalPlanError::BusinessRule(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
