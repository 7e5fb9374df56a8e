use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub whatsapp_api_base: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_access_token: String,
    pub assistant_api_base: String,
    pub assistant_api_key: String,
    pub assistant_text_model: String,
    pub assistant_speech_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            whatsapp_api_base: env::var("WHATSAPP_API_BASE")
                .unwrap_or_else(|_| "https://graph.facebook.com/v21.0".to_string()),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_PHONE_NUMBER_ID not set, using empty value");
                    String::new()
                }),
            whatsapp_access_token: env::var("WHATSAPP_ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_ACCESS_TOKEN not set, using empty value");
                    String::new()
                }),
            assistant_api_base: env::var("ASSISTANT_API_BASE")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            assistant_api_key: env::var("ASSISTANT_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("ASSISTANT_API_KEY not set, using empty value");
                    String::new()
                }),
            assistant_text_model: env::var("ASSISTANT_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".to_string()),
            assistant_speech_model: env::var("ASSISTANT_SPEECH_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-tts".to_string()),
        };

        if !config.is_messaging_configured() {
            warn!("Messaging delivery not fully configured - template sends will fall back to manual links");
        }
        if !config.is_assistant_configured() {
            warn!("Assistant generation not configured - explainer endpoints will serve fallback text");
        }

        config
    }

    pub fn is_messaging_configured(&self) -> bool {
        !self.whatsapp_phone_number_id.is_empty() && !self.whatsapp_access_token.is_empty()
    }

    pub fn is_assistant_configured(&self) -> bool {
        !self.assistant_api_key.is_empty()
    }
}
