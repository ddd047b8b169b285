use saas_weekly::notifier::Messages;
use serde_json::json;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;
use crate::helpers::InMemoryRegistrar;

/// Test the `/api/newsletter` endpoint with a valid request
#[tokio::test]
async fn subscribe_ok() {
    let app = spawn_app().await;
    let resp = app.post_newsletter(json!({ "email": "foo@bar.com" })).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(app.registrar.emails(), ["foo@bar.com"]);
}

#[tokio::test]
async fn subscribe_stores_trimmed_email() {
    let app = spawn_app().await;
    let resp = app.post_newsletter(json!({ "email": "  foo@bar.com\n" })).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(app.registrar.emails(), ["foo@bar.com"]);
}

#[tokio::test]
async fn subscribe_twice_ok() {
    let app = spawn_app().await;
    for _ in 0..2 {
        let resp = app.post_newsletter(json!({ "email": "foo@bar.com" })).await;
        assert_eq!(resp.status().as_u16(), 200);
    }
    assert_eq!(app.registrar.emails().len(), 1);
}

/// Test the `/api/newsletter` endpoint with missing/invalid fields
#[tokio::test]
async fn subscribe_invalid() {
    let app = spawn_app().await;

    for (body, msg) in [
        (json!({}), "null email"),
        (json!({ "email": 42 }), "wrong type"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "not-an-email" }), "invalid email"),
        (json!({ "email": "john@foo" }), "undotted domain"),
    ] {
        let resp = app.post_newsletter(body).await;
        assert_eq!(resp.status().as_u16(), 400, "{msg}");
    }
    assert!(app.registrar.emails().is_empty());
}

#[tokio::test]
async fn invalid_email_message() {
    let app = spawn_app().await;
    let resp = app.post_newsletter(json!({ "email": "not-an-email" })).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], Messages::default().invalid_email_title);
}

#[tokio::test]
async fn registration_failure_is_500() {
    let app = spawn_app_with(InMemoryRegistrar::broken()).await;
    let resp = app.post_newsletter(json!({ "email": "foo@bar.com" })).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], Messages::default().failure);
}
