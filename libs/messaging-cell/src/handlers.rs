// libs/messaging-cell/src/handlers.rs
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use notification_cell::models::{NotificationCategory, NotificationKind};
use notification_cell::services::store::NotificationStore;
use shared_models::error::AppError;

use crate::models::{ConnectivityTestRequest, ManualLinkRequest, ReminderRequest, SmsReminderRequest};
use crate::services::sms::SmsGateway;
use crate::services::whatsapp::WhatsAppClient;

#[derive(Clone)]
pub struct MessagingState {
    pub client: WhatsAppClient,
    pub sms: SmsGateway,
    pub notifications: NotificationStore,
}

const CONNECTIVITY_TEST_MESSAGE: &str =
    "Teste de Integração ClinicaPro: Sistema configurado com sucesso!";

/// Settings-screen connectivity check. Tries the official template channel
/// first; on failure reports the manual wa.me link instead of failing the
/// request - delivery problems are never fatal.
#[axum::debug_handler]
pub async fn test_connectivity(
    State(state): State<MessagingState>,
    Json(request): Json<ConnectivityTestRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .notifications
        .record(
            "Testing Meta connectivity...",
            NotificationKind::Info,
            None,
            NotificationCategory::General,
        )
        .await;

    match state
        .client
        .send_template(&request.phone, "hello_world", &[])
        .await
    {
        Ok(receipt) => {
            state
                .notifications
                .record(
                    "Connectivity test passed: official channel is live.",
                    NotificationKind::Success,
                    None,
                    NotificationCategory::General,
                )
                .await;
            Ok(Json(json!({ "delivered": true, "message_id": receipt.message_id })))
        }
        Err(err) => {
            warn!("Connectivity test failed: {}", err);
            state
                .notifications
                .record(
                    format!("Test finished: {err}. Use the manual link as fallback."),
                    NotificationKind::Warning,
                    None,
                    NotificationCategory::General,
                )
                .await;
            let fallback = state
                .client
                .manual_link(&request.phone, CONNECTIVITY_TEST_MESSAGE);
            Ok(Json(json!({ "delivered": false, "fallback_link": fallback })))
        }
    }
}

#[axum::debug_handler]
pub async fn manual_link(
    State(state): State<MessagingState>,
    Json(request): Json<ManualLinkRequest>,
) -> Result<Json<Value>, AppError> {
    let link = state.client.manual_link(&request.phone, &request.message);
    Ok(Json(json!({ "link": link })))
}

/// Agenda-row reminder: composes the confirmation text and hands staff the
/// wa.me link to open.
#[axum::debug_handler]
pub async fn appointment_reminder(
    State(state): State<MessagingState>,
    Json(request): Json<ReminderRequest>,
) -> Result<Json<Value>, AppError> {
    let message = state.client.confirmation_message(
        &request.patient,
        &request.procedure,
        &request.date,
        &request.time,
    );
    let link = state.client.manual_link(&request.phone, &message);

    state
        .notifications
        .record(
            format!("Opening WhatsApp for {}...", request.patient),
            NotificationKind::Info,
            None,
            NotificationCategory::Appointment,
        )
        .await;

    Ok(Json(json!({ "link": link, "message": message })))
}

/// Day-before reminder over the SMS gateway.
#[axum::debug_handler]
pub async fn sms_reminder(
    State(state): State<MessagingState>,
    Json(request): Json<SmsReminderRequest>,
) -> Result<Json<Value>, AppError> {
    let message = state.sms.reminder_message(
        &request.patient,
        &request.clinic_name,
        &request.date,
        &request.time,
    );
    let receipt = state.sms.send(&request.phone, &message).await;

    Ok(Json(json!(receipt)))
}
