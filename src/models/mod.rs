//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod audit;
pub mod event;
pub mod multimedia;
pub mod reservation;
pub mod user;

// Re-export commonly used models
pub use audit::{EditAuditDetail, EditAuditEntry, EditAuditHeader, FieldChange};
pub use event::{CreateEventRequest, Event, EventChanges, EventState};
pub use multimedia::{CreateMultimediaRequest, MediaType, MediaUpload, Multimedia};
pub use reservation::{
    initial_disposition, Reservation, ReservationState, RESERVATION_TTL_HOURS,
};
pub use user::{Actor, CreateUserRequest, User, UserRole};
