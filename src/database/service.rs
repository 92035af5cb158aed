//! Database service layer
//!
//! This module groups the repositories behind one handle the services share.

use crate::database::{
    AuditRepository, DatabasePool, EventRepository, MultimediaRepository,
    ReservationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub reservations: ReservationRepository,
    pub audit: AuditRepository,
    pub multimedia: MultimediaRepository,
    pub users: UserRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            audit: AuditRepository::new(pool.clone()),
            multimedia: MultimediaRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_service_creation() {
        // Requires a reachable database; skipped when none is configured
        let pool = sqlx::PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let service = DatabaseService::new(pool);
            let _ = &service.events;
            let _ = &service.reservations;
        }
    }
}
