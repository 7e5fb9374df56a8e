// libs/messaging-cell/src/models.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Messaging delivery not configured")]
    NotConfigured,

    #[error("WhatsApp API error: {0}")]
    Api(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// The two automated conversation starters mapped to pre-approved Meta
/// templates. Template messages are the only way to open a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    Booking,
    Reminder,
}

impl TriggerKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            TriggerKind::Booking => "confirmacao_consulta_v1",
            TriggerKind::Reminder => "lembrete_proximo_dia",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPayload {
    pub patient: String,
    pub date: String,
    pub time: String,
    pub phone: String,
}

/// Outbound confirmation seam held by the booking coordinator. Delivery is
/// best-effort: a failure is logged and never rolls back the local booking.
#[async_trait]
pub trait BookingDelivery: Send + Sync {
    async fn trigger_automatic(
        &self,
        kind: TriggerKind,
        payload: BookingPayload,
    ) -> Result<DeliveryReceipt, MessagingError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityTestRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualLinkRequest {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsReminderRequest {
    pub phone: String,
    pub patient: String,
    pub clinic_name: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderRequest {
    pub phone: String,
    pub patient: String,
    pub procedure: String,
    pub date: String,
    pub time: String,
}
