//! Notification dispatch tests against a mock HTTP gateway

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use PedalPlan::config::Settings;
use PedalPlan::models::{
    Event, EventState, Reservation, ReservationState, User, UserRole,
};
use PedalPlan::services::NotificationService;

fn fixture_user() -> User {
    User {
        id: 5,
        full_name: "Marina Suarez".to_string(),
        email: "marina@example.com".to_string(),
        phone: Some("+54 351 555-0001".to_string()),
        role: UserRole::Client,
        created_at: Utc::now(),
    }
}

fn fixture_event() -> Event {
    let date = Utc.with_ymd_and_hms(2027, 3, 14, 9, 0, 0).unwrap();
    Event {
        id: 1,
        name: "Gran Fondo Sierras".to_string(),
        description: None,
        event_date: date,
        location: "Cordoba".to_string(),
        event_type: "ruta".to_string(),
        difficulty: "alta".to_string(),
        cost: Decimal::new(2000, 2),
        max_capacity: 100,
        state: EventState::Published,
        created_by: 10,
        latitude: None,
        longitude: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn fixture_reservation(state: ReservationState) -> Reservation {
    let created_at = Utc::now();
    let expires_at = match state {
        ReservationState::Pending => Some(created_at + Duration::hours(72)),
        _ => None,
    };
    Reservation {
        id: 9,
        event_id: 1,
        user_id: 5,
        state,
        created_at,
        expires_at,
    }
}

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.notifications.email_api_url = format!("{}/send", server.uri());
    settings
}

#[tokio::test]
async fn test_confirmation_is_posted_to_email_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = NotificationService::new(settings_for(&server)).unwrap();
    let result = service
        .send_reservation_confirmation(
            &fixture_user(),
            &fixture_event(),
            &fixture_reservation(ReservationState::Pending),
        )
        .await;

    assert!(result.is_ok());
    let stats = service.get_stats();
    assert_eq!(stats.total_sent, 1);
    assert_eq!(stats.total_failed, 0);
}

#[tokio::test]
async fn test_cancellation_notice_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = NotificationService::new(settings_for(&server)).unwrap();
    let result = service
        .send_cancellation_notice(
            &fixture_user(),
            &fixture_event(),
            &fixture_reservation(ReservationState::Cancelled),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_gateway_failure_is_reported_to_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = NotificationService::new(settings_for(&server)).unwrap();
    let result = service
        .send_reservation_confirmation(
            &fixture_user(),
            &fixture_event(),
            &fixture_reservation(ReservationState::Confirmed),
        )
        .await;

    // The caller (a spawned task) logs this; the primary operation has
    // already committed by the time dispatch happens.
    assert!(result.is_err());
    let stats = service.get_stats();
    assert_eq!(stats.total_failed, 1);
}

#[tokio::test]
async fn test_whatsapp_channel_used_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.features.whatsapp_notifications = true;
    settings.notifications.whatsapp_api_url = Some(format!("{}/whatsapp", server.uri()));

    let service = NotificationService::new(settings).unwrap();
    let result = service
        .send_reservation_confirmation(
            &fixture_user(),
            &fixture_event(),
            &fixture_reservation(ReservationState::Confirmed),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_undeliverable_email_is_rejected_before_the_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut user = fixture_user();
    user.email = "not-an-address".to_string();

    let service = NotificationService::new(settings_for(&server)).unwrap();
    let result = service
        .send_reservation_confirmation(
            &user,
            &fixture_event(),
            &fixture_reservation(ReservationState::Confirmed),
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_bad_phone_skips_whatsapp_but_email_still_goes_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.features.whatsapp_notifications = true;
    settings.notifications.whatsapp_api_url = Some(format!("{}/whatsapp", server.uri()));

    let mut user = fixture_user();
    user.phone = Some("ext. 42".to_string());

    let service = NotificationService::new(settings).unwrap();
    let result = service
        .send_reservation_confirmation(
            &user,
            &fixture_event(),
            &fixture_reservation(ReservationState::Confirmed),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_whatsapp_failure_does_not_mask_email_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.features.whatsapp_notifications = true;
    settings.notifications.whatsapp_api_url = Some(format!("{}/whatsapp", server.uri()));

    let service = NotificationService::new(settings).unwrap();
    let result = service
        .send_reservation_confirmation(
            &fixture_user(),
            &fixture_event(),
            &fixture_reservation(ReservationState::Confirmed),
        )
        .await;

    assert!(result.is_ok());
}
