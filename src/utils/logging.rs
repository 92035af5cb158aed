//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PedalPlan application.

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;

const MAX_LOGGED_ERROR_LEN: usize = 200;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer for the rolling file layer;
/// the caller must keep it alive for the lifetime of the process or the file
/// layer stops flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "pedalplan.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log reservation lifecycle actions with structured data
pub fn log_reservation_action(reservation_id: i64, event_id: i64, user_id: i64, action: &str) {
    info!(
        reservation_id = reservation_id,
        event_id = event_id,
        user_id = user_id,
        action = action,
        "Reservation action performed"
    );
}

/// Log event edit audit entries
pub fn log_audit_entry(event_id: i64, editor_id: i64, changed_fields: usize) {
    info!(
        event_id = event_id,
        editor_id = editor_id,
        changed_fields = changed_fields,
        "Edit audit entry recorded"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log notification dispatch failures (swallowed at the dispatcher boundary).
/// Gateway error bodies can run long; the logged form is truncated.
pub fn log_notification_failure(channel: &str, recipient: &str, error: &str) {
    let error = truncate_text(error, MAX_LOGGED_ERROR_LEN);
    error!(
        channel = channel,
        recipient = recipient,
        error = %error,
        "Notification dispatch failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_layer_survives_init() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            level: "info".to_string(),
            file_path: dir.path().to_string_lossy().to_string(),
        };

        let guard = init_logging(&config).unwrap();
        info!("line destined for the rolling file");
        drop(guard);

        // Dropping the guard flushes the background writer
        let wrote_something = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.metadata().map(|m| m.len() > 0).unwrap_or(false));
        assert!(wrote_something);
    }
}
