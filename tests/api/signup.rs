//! The signup state machine driven against the running API over HTTP

use std::time::Duration;

use saas_weekly::controller::SubscriptionController;
use saas_weekly::domain::Phase;
use saas_weekly::domain::SubmissionError;
use saas_weekly::notifier::ChannelNotifier;
use saas_weekly::notifier::Messages;
use saas_weekly::notifier::NotificationKind;
use saas_weekly::registration::HttpRegistrar;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;
use crate::helpers::InMemoryRegistrar;

fn http_registrar(addr: &str) -> HttpRegistrar {
    HttpRegistrar::new(addr, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn form_signup_reaches_submitted() {
    let app = spawn_app().await;
    let (notifier, mut rx) = ChannelNotifier::new();
    let controller = SubscriptionController::new(http_registrar(&app.addr), notifier);

    controller.set_email("user@example.com");
    controller.submit().await;

    assert_eq!(controller.phase(), Phase::Submitted);
    assert_eq!(app.registrar.emails(), ["user@example.com"]);
    let notification = rx.try_recv().unwrap();
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(notification.title, Messages::default().success_title);
}

#[tokio::test]
async fn server_error_message_reaches_the_user() {
    let app = spawn_app_with(InMemoryRegistrar::broken()).await;
    let (notifier, mut rx) = ChannelNotifier::new();
    let controller = SubscriptionController::new(http_registrar(&app.addr), notifier);

    controller.set_email("user@example.com");
    controller.submit().await;

    let failure = Messages::default().failure;
    let state = controller.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.last_error, Some(SubmissionError::TransportFailure(failure.clone())));
    let notification = rx.try_recv().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, failure);
}

#[tokio::test]
async fn unreachable_api_reports_the_network_error() {
    // nothing listens on the discard port
    let (notifier, mut rx) = ChannelNotifier::new();
    let controller = SubscriptionController::new(http_registrar("http://127.0.0.1:9"), notifier);

    controller.set_email("user@example.com");
    controller.submit().await;

    assert_eq!(controller.phase(), Phase::Idle);
    let notification = rx.try_recv().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_ne!(notification.message, Messages::default().failure);
    assert!(notification.message.contains("127.0.0.1:9"), "{}", notification.message);
    assert_eq!(
        controller.state().last_error,
        Some(SubmissionError::TransportFailure(notification.message))
    );
}

#[tokio::test]
async fn signup_again_after_reset() {
    let app = spawn_app().await;
    let (notifier, _rx) = ChannelNotifier::new();
    let controller = SubscriptionController::new(http_registrar(&app.addr), notifier);

    controller.set_email("first@example.com");
    controller.submit().await;
    controller.reset();
    controller.set_email("second@example.com");
    controller.submit().await;

    assert_eq!(controller.phase(), Phase::Submitted);
    assert_eq!(app.registrar.emails(), ["first@example.com", "second@example.com"]);
}
