//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub notifications: NotificationsConfig,
    pub storage: StorageConfig,
    pub access: AccessConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Notification gateway configuration (email + optional WhatsApp channel)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    pub email_api_url: String,
    pub email_from: String,
    pub whatsapp_api_url: Option<String>,
    pub timeout_seconds: u64,
}

/// Media storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub media_dir: String,
    pub public_base_url: String,
}

/// Access control configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
    /// User ids granted supervisor privileges regardless of stored role
    pub supervisor_ids: Vec<i64>,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub whatsapp_notifications: bool,
    pub media_library: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("PEDALPLAN"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PedalPlanError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/pedalplan".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            notifications: NotificationsConfig {
                email_api_url: "https://mail.example.com/api/send".to_string(),
                email_from: "no-reply@pedalplan.example.com".to_string(),
                whatsapp_api_url: None,
                timeout_seconds: 5,
            },
            storage: StorageConfig {
                media_dir: "/var/lib/pedalplan/media".to_string(),
                public_base_url: "/media".to_string(),
            },
            access: AccessConfig {
                supervisor_ids: vec![],
            },
            i18n: I18nConfig {
                default_language: "es".to_string(),
                supported_languages: vec!["es".to_string(), "en".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/pedalplan".to_string(),
            },
            features: FeaturesConfig {
                whatsapp_notifications: false,
                media_library: true,
            },
        }
    }
}
