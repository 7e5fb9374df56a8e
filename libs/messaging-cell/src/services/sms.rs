// libs/messaging-cell/src/services/sms.rs
use serde::Serialize;
use tracing::info;

/// SMS gateway placeholder. A production deployment would swap this for a
/// Twilio/BulkSMS integration; the send contract stays the same.
#[derive(Clone, Default)]
pub struct SmsGateway;

#[derive(Debug, Clone, Serialize)]
pub struct SmsReceipt {
    pub success: bool,
    pub provider: String,
}

impl SmsGateway {
    pub fn new() -> Self {
        Self
    }

    pub async fn send(&self, phone: &str, message: &str) -> SmsReceipt {
        info!("[SMS gateway] sending to {}: {}", phone, message);
        SmsReceipt {
            success: true,
            provider: "MEO/Vodafone Enterprise".to_string(),
        }
    }

    pub fn reminder_message(
        &self,
        patient: &str,
        clinic_name: &str,
        date: &str,
        time: &str,
    ) -> String {
        format!(
            "SMS: Olá {patient}, lembramos a sua consulta na {clinic_name} amanhã, {date} às {time}. Se precisar de reagendar, ligue para a clínica."
        )
    }
}
