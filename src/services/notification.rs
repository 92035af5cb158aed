//! Notification service implementation
//!
//! This service formats and delivers reservation notifications through the
//! configured email gateway and the optional WhatsApp gateway. It is invoked
//! from spawned tasks after the primary transaction commits; failures are
//! logged at this boundary and never affect the reservation outcome.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::models::{Event, Reservation, ReservationState, User};
use crate::utils::errors::{PedalPlanError, Result};
use crate::utils::helpers::{format_timestamp, is_valid_email, is_valid_phone};

/// Message template structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub key: String,
    pub subject: HashMap<String, String>, // language -> subject mapping
    pub content: HashMap<String, String>, // language -> content mapping
}

/// Payload for the email gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub message_id: Uuid,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Payload for the WhatsApp gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppMessage {
    pub message_id: Uuid,
    pub to: String,
    pub body: String,
}

/// Notification statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
    pub sent_by_template: HashMap<String, u64>,
}

/// Notification service for reservation messaging
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    settings: Settings,
    templates: HashMap<String, MessageTemplate>,
    stats: Arc<Mutex<NotificationStats>>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.notifications.timeout_seconds))
            .user_agent("PedalPlan/1.0")
            .build()
            .map_err(PedalPlanError::Http)?;

        Ok(Self {
            client,
            settings,
            templates: Self::load_default_templates(),
            stats: Arc::new(Mutex::new(NotificationStats::default())),
        })
    }

    /// Send the confirmation message for a freshly created reservation.
    /// Pending reservations mention the payment deadline; confirmed ones
    /// just confirm the spot.
    pub async fn send_reservation_confirmation(
        &self,
        user: &User,
        event: &Event,
        reservation: &Reservation,
    ) -> Result<()> {
        let template_key = match reservation.state {
            ReservationState::Pending => "reservation_pending",
            _ => "reservation_confirmed",
        };

        let mut parameters = self.event_parameters(event);
        parameters.insert("first_name".to_string(), user.full_name.clone());
        if let Some(expires_at) = reservation.expires_at {
            parameters.insert("payment_deadline".to_string(), format_timestamp(expires_at));
        }

        self.dispatch(user, template_key, &parameters).await
    }

    /// Send the cancellation notice for a reservation
    pub async fn send_cancellation_notice(
        &self,
        user: &User,
        event: &Event,
        _reservation: &Reservation,
    ) -> Result<()> {
        let mut parameters = self.event_parameters(event);
        parameters.insert("first_name".to_string(), user.full_name.clone());

        self.dispatch(user, "reservation_cancelled", &parameters).await
    }

    /// Deliver one templated message to the recipient's channels
    async fn dispatch(
        &self,
        user: &User,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<()> {
        let language = &self.settings.i18n.default_language;
        let subject = self.format_subject(template_key, language, parameters)?;
        let body = self.format_message(template_key, language, parameters)?;

        debug!(
            user_id = user.id,
            template_key = template_key,
            "Dispatching notification"
        );

        if !is_valid_email(&user.email) {
            return Err(PedalPlanError::BusinessRule(format!(
                "Recipient {} has no deliverable email address",
                user.id
            )));
        }

        // WhatsApp is a secondary channel; a failure there is logged and
        // must not mask a successful email.
        if self.settings.features.whatsapp_notifications {
            if let (Some(gateway), Some(phone)) = (
                self.settings.notifications.whatsapp_api_url.as_ref(),
                user.phone.as_ref(),
            ) {
                if !is_valid_phone(phone) {
                    warn!(
                        user_id = user.id,
                        "Stored phone number is not deliverable, skipping WhatsApp"
                    );
                } else if let Err(e) = self.send_whatsapp(gateway, phone, &body).await {
                    warn!(
                        user_id = user.id,
                        error = %e,
                        "Failed to send WhatsApp notification"
                    );
                }
            }
        }

        match self.send_email(&user.email, &subject, &body).await {
            Ok(()) => {
                self.update_stats_success(template_key);
                info!(
                    user_id = user.id,
                    template_key = template_key,
                    "Notification sent successfully"
                );
                Ok(())
            }
            Err(e) => {
                self.update_stats_failure();
                Err(e)
            }
        }
    }

    /// Post one message to the email gateway
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = EmailMessage {
            message_id: Uuid::new_v4(),
            from: self.settings.notifications.email_from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };

        self.client
            .post(&self.settings.notifications.email_api_url)
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Post one message to the WhatsApp gateway
    async fn send_whatsapp(&self, gateway: &str, phone: &str, body: &str) -> Result<()> {
        let message = WhatsAppMessage {
            message_id: Uuid::new_v4(),
            to: phone.to_string(),
            body: body.to_string(),
        };

        self.client
            .post(gateway)
            .json(&message)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn event_parameters(&self, event: &Event) -> HashMap<String, String> {
        let mut parameters = HashMap::new();
        parameters.insert("event_name".to_string(), event.name.clone());
        parameters.insert("event_date".to_string(), format_timestamp(event.event_date));
        parameters.insert("event_location".to_string(), event.location.clone());
        parameters
    }

    /// Format message body using template and parameters
    fn format_message(
        &self,
        template_key: &str,
        language: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<String> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            PedalPlanError::Internal(format!("Template not found: {}", template_key))
        })?;

        let content = template
            .content
            .get(language)
            .or_else(|| template.content.get(&self.settings.i18n.default_language))
            .ok_or_else(|| {
                PedalPlanError::Internal(format!(
                    "Template content not found for language: {}",
                    language
                ))
            })?;

        Ok(Self::substitute(content, parameters))
    }

    /// Format message subject using template and parameters
    fn format_subject(
        &self,
        template_key: &str,
        language: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<String> {
        let template = self.templates.get(template_key).ok_or_else(|| {
            PedalPlanError::Internal(format!("Template not found: {}", template_key))
        })?;

        let subject = template
            .subject
            .get(language)
            .or_else(|| template.subject.get(&self.settings.i18n.default_language))
            .ok_or_else(|| {
                PedalPlanError::Internal(format!(
                    "Template subject not found for language: {}",
                    language
                ))
            })?;

        Ok(Self::substitute(subject, parameters))
    }

    fn substitute(text: &str, parameters: &HashMap<String, String>) -> String {
        let mut formatted = text.to_string();
        for (key, value) in parameters {
            let placeholder = format!("{{{}}}", key);
            formatted = formatted.replace(&placeholder, value);
        }
        formatted
    }

    /// Update success statistics
    fn update_stats_success(&self, template_key: &str) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.total_sent += 1;
            *stats
                .sent_by_template
                .entry(template_key.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Update failure statistics
    fn update_stats_failure(&self) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.total_failed += 1;
        }
    }

    /// Get a snapshot of notification statistics
    pub fn get_stats(&self) -> NotificationStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Get available template keys
    pub fn get_template_keys(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Load default message templates
    fn load_default_templates() -> HashMap<String, MessageTemplate> {
        let mut templates = HashMap::new();

        let mut subject = HashMap::new();
        subject.insert("es".to_string(), "Reserva confirmada: {event_name}".to_string());
        subject.insert("en".to_string(), "Reservation confirmed: {event_name}".to_string());
        let mut content = HashMap::new();
        content.insert(
            "es".to_string(),
            "Hola {first_name}, tu lugar en {event_name} ({event_location}, {event_date}) quedó confirmado. ¡Nos vemos en la ruta!".to_string(),
        );
        content.insert(
            "en".to_string(),
            "Hi {first_name}, your spot at {event_name} ({event_location}, {event_date}) is confirmed. See you on the road!".to_string(),
        );
        templates.insert(
            "reservation_confirmed".to_string(),
            MessageTemplate {
                key: "reservation_confirmed".to_string(),
                subject,
                content,
            },
        );

        let mut subject = HashMap::new();
        subject.insert("es".to_string(), "Reserva pendiente de pago: {event_name}".to_string());
        subject.insert("en".to_string(), "Reservation pending payment: {event_name}".to_string());
        let mut content = HashMap::new();
        content.insert(
            "es".to_string(),
            "Hola {first_name}, reservamos tu lugar en {event_name} ({event_location}, {event_date}). Tenés tiempo para pagar hasta {payment_deadline}; pasado ese plazo la reserva vence.".to_string(),
        );
        content.insert(
            "en".to_string(),
            "Hi {first_name}, we reserved your spot at {event_name} ({event_location}, {event_date}). Payment is due by {payment_deadline}; after that the reservation expires.".to_string(),
        );
        templates.insert(
            "reservation_pending".to_string(),
            MessageTemplate {
                key: "reservation_pending".to_string(),
                subject,
                content,
            },
        );

        let mut subject = HashMap::new();
        subject.insert("es".to_string(), "Reserva cancelada: {event_name}".to_string());
        subject.insert("en".to_string(), "Reservation cancelled: {event_name}".to_string());
        let mut content = HashMap::new();
        content.insert(
            "es".to_string(),
            "Hola {first_name}, tu reserva para {event_name} ({event_date}) fue cancelada. Tu lugar quedó liberado.".to_string(),
        );
        content.insert(
            "en".to_string(),
            "Hi {first_name}, your reservation for {event_name} ({event_date}) was cancelled. Your spot has been released.".to_string(),
        );
        templates.insert(
            "reservation_cancelled".to_string(),
            MessageTemplate {
                key: "reservation_cancelled".to_string(),
                subject,
                content,
            },
        );

        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let service = NotificationService::new(Settings::default()).unwrap();

        let mut parameters = HashMap::new();
        parameters.insert("first_name".to_string(), "Marina".to_string());
        parameters.insert("event_name".to_string(), "Vuelta al Valle".to_string());
        parameters.insert("event_location".to_string(), "Cordoba".to_string());
        parameters.insert("event_date".to_string(), "2026-10-01".to_string());

        let result = service
            .format_message("reservation_confirmed", "es", &parameters)
            .unwrap();
        assert!(result.contains("Marina"));
        assert!(result.contains("Vuelta al Valle"));
        assert!(!result.contains('{'));
    }

    #[test]
    fn test_falls_back_to_default_language() {
        let service = NotificationService::new(Settings::default()).unwrap();

        let parameters = HashMap::new();
        let result = service.format_message("reservation_cancelled", "de", &parameters);
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_template_is_internal_error() {
        let service = NotificationService::new(Settings::default()).unwrap();

        let result = service.format_message("nonexistent", "es", &HashMap::new());
        assert!(matches!(result, Err(PedalPlanError::Internal(_))));
    }

    #[test]
    fn test_default_templates_present() {
        let service = NotificationService::new(Settings::default()).unwrap();
        let keys = service.get_template_keys();
        assert!(keys.contains(&"reservation_confirmed".to_string()));
        assert!(keys.contains(&"reservation_pending".to_string()));
        assert!(keys.contains(&"reservation_cancelled".to_string()));
    }

    #[test]
    fn test_stats_update() {
        let service = NotificationService::new(Settings::default()).unwrap();

        service.update_stats_success("reservation_confirmed");
        service.update_stats_success("reservation_confirmed");
        service.update_stats_failure();

        let stats = service.get_stats();
        assert_eq!(stats.total_sent, 2);
        assert_eq!(stats.total_failed, 1);
        assert_eq!(
            stats.sent_by_template.get("reservation_confirmed"),
            Some(&2)
        );
    }
}
