//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{PedalPlanError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_notifications_config(&settings.notifications)?;
    validate_storage_config(&settings.storage)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PedalPlanError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(PedalPlanError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PedalPlanError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate notification gateway configuration
fn validate_notifications_config(config: &super::NotificationsConfig) -> Result<()> {
    if config.email_api_url.is_empty() {
        return Err(PedalPlanError::Config(
            "Email gateway URL is required".to_string(),
        ));
    }

    Url::parse(&config.email_api_url)
        .map_err(|e| PedalPlanError::Config(format!("Invalid email gateway URL: {}", e)))?;

    if let Some(ref whatsapp_url) = config.whatsapp_api_url {
        Url::parse(whatsapp_url)
            .map_err(|e| PedalPlanError::Config(format!("Invalid WhatsApp gateway URL: {}", e)))?;
    }

    if config.email_from.is_empty() {
        return Err(PedalPlanError::Config(
            "Email sender address is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(PedalPlanError::Config(
            "Notification timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate media storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.media_dir.is_empty() {
        return Err(PedalPlanError::Config(
            "Media storage directory is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(PedalPlanError::Config(
            "Default language is required".to_string(),
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(PedalPlanError::Config(
            "Default language must be in supported languages list".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PedalPlanError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PedalPlanError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_bad_gateway_url() {
        let mut settings = Settings::default();
        settings.notifications.email_api_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_connection_bounds() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_default_language_must_be_supported() {
        let mut settings = Settings::default();
        settings.i18n.default_language = "pt".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
