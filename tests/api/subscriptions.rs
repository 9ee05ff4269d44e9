use crate::helpers::{spawn_app, spawn_unconfigured_app};
use email_subscription_api::clients::ontraport_client::fixtures::{
    contact_payload, created_contact_response, search_response, tag_response,
};
use email_subscription_api::subscription::{EmailSubscriptionMessage, SubscriptionConfirmation};
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn subscribe_returns_a_success_payload_for_a_new_contact() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[])))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_contact_response(
            contact_payload(7, "A", "a@b.com"),
        )))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1/objects/tagByName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tag_response(0)))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "first_name": "A",
            "email": "a@b.com",
            "tag": "newsletter",
            "source_location": "https://example.com/blog/post",
        }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());

    let payload: SubscriptionConfirmation = response.json().await.unwrap();
    assert_eq!(payload.status, "success");
    assert!(!payload.message.is_empty());
}

#[tokio::test]
async fn subscribe_does_not_create_a_contact_that_already_exists() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            contact_payload(7, "Ursula", "ursula@example.com"),
        ])))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1/objects/tagByName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tag_response(0)))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_rejects_a_tag_missing_from_the_allow_list_without_remote_calls() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "unknown_tag",
        }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("Invalid list."));
}

#[tokio::test]
async fn subscribe_reports_failure_when_no_contact_can_be_resolved() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>offline</html>"))
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("Failed to subscribe."));
}

#[tokio::test]
async fn subscribe_reports_a_transport_error_when_tagging_is_unreachable() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            contact_payload(7, "Ursula", "ursula@example.com"),
        ])))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    // Exceeds the client timeout configured by spawn_app
    Mock::given(method("PUT"))
        .and(path("/1/objects/tagByName"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tag_response(0))
                .set_delay(std::time::Duration::from_secs(180)),
        )
        .expect(1)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("Tagging"));
    assert!(payload.email_subscription_message[0].contains("try again"));
}

#[tokio::test]
async fn subscribe_reports_a_provider_rejection_of_the_tag() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/1/Contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            contact_payload(7, "Ursula", "ursula@example.com"),
        ])))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1/objects/tagByName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tag_response(141)))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("Some error occurred."));
}

#[tokio::test]
async fn an_unconfigured_service_refuses_subscriptions_without_remote_calls() {
    // Arrange
    let app = spawn_unconfigured_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("not configured"));
}

#[tokio::test]
async fn subscribe_returns_a_400_when_the_email_is_invalid() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "definitely-not-an-email",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());

    let payload: EmailSubscriptionMessage = response.json().await.unwrap();
    assert!(payload.email_subscription_message[0].contains("valid email"));
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({"tag": "newsletter"}), "missing the email"),
        (
            serde_json::json!({"email": "ursula@example.com"}),
            "missing the tag",
        ),
        (serde_json::json!({}), "missing both email and tag"),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act
        let response = app.post_subscriptions(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customised error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn subscribe_sends_the_credential_headers_to_the_provider() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("GET"))
        .and(path("/1/Contacts"))
        .and(header("Api-Appid", "test-app-id"))
        .and(header("Api-Key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            contact_payload(7, "Ursula", "ursula@example.com"),
        ])))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1/objects/tagByName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tag_response(0)))
        .expect(1)
        .mount(&app.ontraport_server)
        .await;

    // Act
    let response = app
        .post_subscriptions(&serde_json::json!({
            "email": "ursula@example.com",
            "tag": "newsletter",
        }))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
}
