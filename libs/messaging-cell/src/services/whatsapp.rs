// libs/messaging-cell/src/services/whatsapp.rs
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{BookingDelivery, BookingPayload, DeliveryReceipt, MessagingError, TriggerKind};

/// WhatsApp Business (Meta Graph API) client. Conversations opened by the
/// clinic must start from a pre-approved template; the manual wa.me link is
/// the fallback channel when the official API is unavailable.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    config: Arc<AppConfig>,
}

impl WhatsAppClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Send a template message through the Graph API.
    pub async fn send_template(
        &self,
        to: &str,
        template_name: &str,
        params: &[String],
    ) -> Result<DeliveryReceipt, MessagingError> {
        if !self.config.is_messaging_configured() {
            return Err(MessagingError::NotConfigured);
        }

        let clean_phone = digits_only(to);
        let url = format!(
            "{}/{}/messages",
            self.config.whatsapp_api_base, self.config.whatsapp_phone_number_id
        );

        debug!("Sending template \"{}\" to {}", template_name, clean_phone);

        let parameters: Vec<Value> = params
            .iter()
            .map(|text| json!({ "type": "text", "text": text }))
            .collect();

        let mut template = json!({
            "name": template_name,
            "language": { "code": "pt_PT" }
        });
        if !parameters.is_empty() {
            template["components"] = json!([{ "type": "body", "parameters": parameters }]);
        }

        let response = self
            .http
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.whatsapp_access_token),
            )
            .json(&json!({
                "messaging_product": "whatsapp",
                "to": clean_phone,
                "type": "template",
                "template": template
            }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            error!("WhatsApp API rejected template send: {}", message);
            return Err(MessagingError::Api(message));
        }

        let message_id = body["messages"][0]["id"]
            .as_str()
            .ok_or_else(|| MessagingError::Api("Unexpected response shape".to_string()))?
            .to_string();

        info!("Template delivered, message id {}", message_id);
        Ok(DeliveryReceipt { message_id })
    }

    /// Fallback channel: a wa.me compose link the staff opens by hand.
    /// Nine-digit local numbers get the Portuguese country prefix.
    pub fn manual_link(&self, phone: &str, message: &str) -> String {
        let clean = digits_only(phone);
        let full = if clean.len() <= 9 {
            format!("351{clean}")
        } else {
            clean
        };
        format!("https://wa.me/{}?text={}", full, urlencoding::encode(message))
    }

    /// Patient-facing confirmation text, used by the manual reminder flow.
    pub fn confirmation_message(
        &self,
        patient: &str,
        procedure: &str,
        date: &str,
        time: &str,
    ) -> String {
        format!(
            "Olá {patient}! Confirmamos a sua consulta de *{procedure}* para o dia *{date}* às *{time}*. \n\nAté breve!"
        )
    }
}

#[async_trait]
impl BookingDelivery for WhatsAppClient {
    async fn trigger_automatic(
        &self,
        kind: TriggerKind,
        payload: BookingPayload,
    ) -> Result<DeliveryReceipt, MessagingError> {
        debug!("Automation trigger fired: {:?}", kind);

        let params = vec![
            some_or(&payload.patient, "Paciente"),
            some_or(&payload.date, "---"),
            some_or(&payload.time, "---"),
        ];

        self.send_template(&payload.phone, kind.template_name(), &params)
            .await
    }
}

fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

fn some_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WhatsAppClient {
        WhatsAppClient::new(Arc::new(AppConfig {
            bind_addr: String::new(),
            whatsapp_api_base: "https://graph.facebook.com/v21.0".to_string(),
            whatsapp_phone_number_id: "123".to_string(),
            whatsapp_access_token: "token".to_string(),
            assistant_api_base: String::new(),
            assistant_api_key: String::new(),
            assistant_text_model: String::new(),
            assistant_speech_model: String::new(),
        }))
    }

    #[test]
    fn manual_link_prefixes_local_numbers() {
        let link = client().manual_link("912 345 678", "Olá!");
        assert!(link.starts_with("https://wa.me/351912345678?text="));
    }

    #[test]
    fn manual_link_keeps_international_numbers() {
        let link = client().manual_link("(+351) 912 888 777", "hi");
        assert!(link.starts_with("https://wa.me/351912888777?text="));
    }

    #[test]
    fn manual_link_encodes_the_message() {
        let link = client().manual_link("912345678", "Consulta às 09:00");
        assert!(link.contains("Consulta%20%C3%A0s%2009%3A00"));
    }
}
