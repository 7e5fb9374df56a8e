// libs/assistant-cell/src/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainerItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetExplainerRequest {
    pub procedure: String,
    #[serde(default)]
    pub items: Vec<ExplainerItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AftercareRequest {
    pub patient_name: String,
    pub procedure: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}
