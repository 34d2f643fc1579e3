//! tests/api/tracking.rs

use crate::helpers::{setup, setup_with_ordering};
use fedex_notify::tracking::PersistOrdering;
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

fn valid_body() -> Value {
    json!({
        "tracking_number": "794698765432",
        "recipient_email": "ursula_le_guin@gmail.com"
    })
}

#[tokio::test]
async fn update_tracking_returns_a_200_when_fedex_accepts() {
    // Arrange
    let test = setup().await;
    test.mount_token().await;

    Mock::given(method("POST"))
        .and(path("/track/v1/notifications"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test.fedex_server)
        .await;

    // Act
    let response = test.post_tracking(42, valid_body()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "processed",
            "persisted": true,
            "notification": { "success": true, "carrier_error_messages": [] }
        })
    );
    assert_eq!(test.stored_tracking_number(42).as_deref(), Some("794698765432"));
}

#[tokio::test]
async fn update_tracking_sends_the_recipient_to_fedex() {
    // Arrange
    let test = setup().await;
    test.mount_token().await;

    Mock::given(path("/track/v1/notifications"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test.fedex_server)
        .await;

    // Act
    test.post_tracking(42, valid_body()).await;

    // Assert
    let requests = test.fedex_server.received_requests().await.unwrap();
    let notification = requests
        .iter()
        .find(|request| request.url.path() == "/track/v1/notifications")
        .expect("No notification was sent");
    let payload: Value = serde_json::from_slice(&notification.body).unwrap();
    assert_eq!(payload["trackingNumberInfo"]["trackingNumber"], "794698765432");
    assert_eq!(
        payload["trackingEventNotificationDetail"]["trackingNotifications"][0]
            ["notificationDetail"]["emailDetail"]["emailAddress"],
        "ursula_le_guin@gmail.com"
    );
}

#[tokio::test]
async fn update_tracking_returns_a_502_with_carrier_messages_when_fedex_rejects() {
    // Arrange
    let test = setup().await;
    test.mount_token().await;
    test.store_tracking_number(42, "111111111111");

    Mock::given(path("/track/v1/notifications"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "transactionId": "624deea6-b709-470c-8c39-4b5511281492",
            "errors": [{
                "code": "TRACKING.TRACKINGNUMBER.NOTFOUND",
                "message": "Tracking number cannot be found. Please correct the tracking number and try again."
            }]
        })))
        .expect(1)
        .mount(&test.fedex_server)
        .await;

    // Act
    let response = test.post_tracking(42, valid_body()).await;

    // Assert
    assert_eq!(502, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["persisted"], false);
    assert_eq!(body["notification"]["success"], false);
    assert_eq!(body["notification"]["failure"], "carrier_rejected");
    assert_eq!(
        body["notification"]["carrier_error_messages"],
        json!(["Tracking number cannot be found. Please correct the tracking number and try again."])
    );
    assert_eq!(test.stored_tracking_number(42), None);
}

#[tokio::test]
async fn update_tracking_keeps_the_number_when_persisting_first() {
    // Arrange
    let test = setup_with_ordering(PersistOrdering::PersistThenNotify).await;
    test.mount_token().await;

    Mock::given(path("/track/v1/notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&test.fedex_server)
        .await;

    // Act
    let response = test.post_tracking(42, valid_body()).await;

    // Assert
    assert_eq!(502, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["persisted"], true);
    assert_eq!(body["notification"]["failure"], "malformed_response");
    assert_eq!(body["notification"]["carrier_error_messages"], json!([]));
    assert_eq!(test.stored_tracking_number(42).as_deref(), Some("794698765432"));
}

#[tokio::test]
async fn update_tracking_does_not_notify_when_authentication_fails() {
    // Arrange
    let test = setup().await;

    Mock::given(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{
                "code": "NOT.AUTHORIZED.ERROR",
                "message": "The given client credentials were not valid. Please modify your request and try again."
            }]
        })))
        .expect(1)
        .mount(&test.fedex_server)
        .await;

    // Act
    let response = test.post_tracking(42, valid_body()).await;

    // Assert
    assert_eq!(502, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["notification"]["failure"], "authentication");
    assert_eq!(test.notifications_sent().await, 0);
}

#[tokio::test]
async fn update_tracking_skips_fedex_for_an_unchanged_number() {
    // Arrange
    let test = setup().await;
    test.store_tracking_number(42, "794698765432");

    // Act
    let response = test.post_tracking(42, valid_body()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "unchanged" }));
    assert!(test.fedex_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_tracking_returns_a_400_when_data_is_invalid() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        (
            json!({"tracking_number": "", "recipient_email": "ursula_le_guin@gmail.com"}),
            "empty tracking number",
        ),
        (
            json!({"tracking_number": "7946-9876", "recipient_email": "ursula_le_guin@gmail.com"}),
            "tracking number with punctuation",
        ),
        (
            json!({"tracking_number": "794698765432", "recipient_email": "notanemail"}),
            "invalid email",
        ),
        (
            json!({"tracking_number": "794698765432"}),
            "missing the email",
        ),
        (
            json!({"recipient_email": "ursula_le_guin@gmail.com"}),
            "missing the tracking number",
        ),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = test.post_tracking(42, body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customised error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }

    assert!(test.fedex_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_tracking_rejects_a_malformed_body() {
    let test = setup().await;

    let response = test.post_raw("/orders/42/tracking", "{not json").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn update_tracking_rejects_a_non_numeric_order_id() {
    let test = setup().await;

    let response = test.post_raw("/orders/abc/tracking", "{}").await;

    assert_eq!(404, response.status().as_u16());
}
