//! PedalPlan backend core
//!
//! Backend core for cycling event management. This library provides the
//! reservation lifecycle engine with transactional capacity accounting, the
//! event-editing audit trail, media replacement, and best-effort
//! notification dispatch. The HTTP surface lives outside this crate; the
//! services here are the contract.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PedalPlanError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
