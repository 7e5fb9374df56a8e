// libs/assistant-cell/src/services/client.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::ExplainerItem;

/// Text/audio generation collaborator. Failures never reach caller state:
/// text endpoints degrade to a human-readable fallback string and speech
/// synthesis degrades to nothing at all.
#[derive(Clone)]
pub struct AssistantClient {
    http: Client,
    config: Arc<AppConfig>,
}

impl AssistantClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Patient-friendly explanation of a treatment budget.
    pub async fn explain_budget(&self, procedure: &str, items: &[ExplainerItem]) -> String {
        let lines = items
            .iter()
            .map(|item| format!("- {}: €{}", item.description, item.price))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Você é um assistente de comunicação para uma clínica de alto padrão em Portugal.\n\
             O médico/dentista propôs o seguinte tratamento: {procedure}.\n\
             Os itens do orçamento são:\n{lines}\n\n\
             Explique este tratamento para o paciente em linguagem extremamente simples, acolhedora e persuasiva.\n\
             Evite termos técnicos complexos. Foque nos benefícios e na saúde do paciente.\n\
             O texto deve ser curto (máximo 3 parágrafos) e terminar com uma chamada para aprovação."
        );

        match self.generate_text(&self.config.assistant_text_model, &prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "Não foi possível gerar a explicação simplificada.".to_string(),
            Err(err) => {
                error!("Budget explainer generation failed: {}", err);
                "Erro ao processar a explicação. Por favor, revise manualmente.".to_string()
            }
        }
    }

    /// Personalized post-procedure instructions.
    pub async fn aftercare_guidance(&self, patient_name: &str, procedure: &str) -> String {
        let prompt = format!(
            "Gere instruções de pós-consulta personalizadas para o paciente {patient_name} \
             que acabou de realizar o procedimento: {procedure}.\n\
             Inclua:\n\
             1. Cuidados imediatos (primeiras 24h).\n\
             2. O que evitar.\n\
             3. Quando entrar em contato com a clínica.\n\
             Use um tom atencioso e profissional."
        );

        match self.generate_text(&self.config.assistant_text_model, &prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "Instruções não disponíveis.".to_string(),
            Err(err) => {
                error!("Aftercare generation failed: {}", err);
                "Erro ao gerar instruções.".to_string()
            }
        }
    }

    /// Raw PCM audio for the given text, or `None` when synthesis is
    /// unavailable.
    pub async fn synthesize_speech(&self, text: &str) -> Option<Vec<u8>> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("Diga com tom profissional e calmo: {text}") }]
            }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": "Kore" }
                    }
                }
            }
        });

        let response = match self
            .request(&self.config.assistant_speech_model, body)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!("Speech synthesis failed: {}", err);
                return None;
            }
        };

        let encoded = response["candidates"][0]["content"]["parts"][0]["inlineData"]["data"]
            .as_str()?;
        match BASE64.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                error!("Speech payload was not valid base64: {}", err);
                None
            }
        }
    }

    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self.request(model, body).await?;

        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Unexpected response shape"))
    }

    async fn request(&self, model: &str, body: Value) -> Result<Value> {
        if !self.config.is_assistant_configured() {
            return Err(anyhow!("Assistant generation not configured"));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.assistant_api_base, model, self.config.assistant_api_key
        );
        debug!("Calling assistant model {}", model);

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Assistant API error {status}: {detail}"));
        }

        Ok(response.json().await?)
    }
}
