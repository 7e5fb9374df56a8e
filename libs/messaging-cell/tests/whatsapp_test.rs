use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use messaging_cell::models::{BookingDelivery, BookingPayload, MessagingError, TriggerKind};
use messaging_cell::services::whatsapp::WhatsAppClient;
use shared_config::AppConfig;

fn client_for(server: &MockServer) -> WhatsAppClient {
    WhatsAppClient::new(Arc::new(AppConfig {
        bind_addr: String::new(),
        whatsapp_api_base: server.uri(),
        whatsapp_phone_number_id: "555000111".to_string(),
        whatsapp_access_token: "test-token".to_string(),
        assistant_api_base: String::new(),
        assistant_api_key: String::new(),
        assistant_text_model: String::new(),
        assistant_speech_model: String::new(),
    }))
}

#[tokio::test]
async fn template_send_returns_the_provider_message_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/555000111/messages"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "messaging_product": "whatsapp",
            "to": "351912345678",
            "type": "template"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "id": "wamid.ABC123" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server)
        .send_template(
            "(+351) 912 345 678",
            "confirmacao_consulta_v1",
            &["Ana Silva".to_string(), "2024-05-20".to_string(), "09:00".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(receipt.message_id, "wamid.ABC123");
}

#[tokio::test]
async fn api_rejection_surfaces_the_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/555000111/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid OAuth access token" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_template("912345678", "hello_world", &[])
        .await
        .unwrap_err();

    assert_matches!(err, MessagingError::Api(message) => {
        assert!(message.contains("Invalid OAuth access token"));
    });
}

#[tokio::test]
async fn automatic_booking_trigger_uses_the_booking_template() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/555000111/messages"))
        .and(body_partial_json(json!({
            "template": { "name": "confirmacao_consulta_v1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "id": "wamid.BOOKING" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server)
        .trigger_automatic(
            TriggerKind::Booking,
            BookingPayload {
                patient: "Ana Silva".to_string(),
                date: "2024-05-20".to_string(),
                time: "09:00".to_string(),
                phone: "912345678".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(receipt.message_id, "wamid.BOOKING");
}

#[tokio::test]
async fn unconfigured_client_fails_before_touching_the_network() {
    let server = MockServer::start().await;

    let client = WhatsAppClient::new(Arc::new(AppConfig {
        bind_addr: String::new(),
        whatsapp_api_base: server.uri(),
        whatsapp_phone_number_id: String::new(),
        whatsapp_access_token: String::new(),
        assistant_api_base: String::new(),
        assistant_api_key: String::new(),
        assistant_text_model: String::new(),
        assistant_speech_model: String::new(),
    }));

    let err = client.send_template("912345678", "hello_world", &[]).await.unwrap_err();
    assert_matches!(err, MessagingError::NotConfigured);
    assert!(server.received_requests().await.unwrap().is_empty());
}
