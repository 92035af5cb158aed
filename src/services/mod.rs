//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod capacity;
pub mod event_edit;
pub mod expiration;
pub mod media;
pub mod notification;
pub mod reservation;

// Re-export commonly used services
pub use auth::{AuthService, Permission};
pub use capacity::{available_for_display, available_slots, has_capacity, Occupancy};
pub use event_edit::{detect_changes, EventEditService};
pub use expiration::ExpirationService;
pub use media::MediaService;
pub use notification::{NotificationService, NotificationStats};
pub use reservation::ReservationService;

use crate::config::settings::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub reservation_service: ReservationService,
    pub event_edit_service: EventEditService,
    pub media_service: MediaService,
    pub notification_service: NotificationService,
    pub expiration_service: ExpirationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, db: DatabaseService, settings: Settings) -> Result<Self> {
        let auth_service = AuthService::new(settings.clone());
        let notification_service = NotificationService::new(settings.clone())?;
        let reservation_service = ReservationService::new(
            pool.clone(),
            db.clone(),
            auth_service.clone(),
            notification_service.clone(),
        );
        let event_edit_service = EventEditService::new(pool, db.clone(), auth_service.clone());
        let media_service = MediaService::new(db.clone(), settings);
        let expiration_service = ExpirationService::new(db);

        Ok(Self {
            auth_service,
            reservation_service,
            event_edit_service,
            media_service,
            notification_service,
            expiration_service,
        })
    }
}
