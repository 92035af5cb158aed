//! Reservation expiration sweep
//!
//! Pending paid reservations carry a 72-hour payment deadline. The deadline
//! stored on the row is only a value; this sweep is what actually moves
//! overdue rows to Expired. It is meant to be run periodically by an
//! external scheduler (the binary runs it once per invocation).

use chrono::Utc;
use tracing::{debug, info};

use crate::database::service::DatabaseService;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct ExpirationService {
    db: DatabaseService,
}

impl ExpirationService {
    /// Create a new ExpirationService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Expire every pending reservation whose deadline has passed.
    /// Returns the number of reservations expired.
    pub async fn run_once(&self) -> Result<u64> {
        let expired = self.db.reservations.expire_overdue(Utc::now()).await?;

        if expired > 0 {
            info!(expired = expired, "Expired overdue pending reservations");
        } else {
            debug!("No overdue pending reservations found");
        }

        Ok(expired)
    }
}
