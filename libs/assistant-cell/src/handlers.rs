// libs/assistant-cell/src/handlers.rs
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{AftercareRequest, BudgetExplainerRequest, SpeechRequest};
use crate::services::client::AssistantClient;

#[axum::debug_handler]
pub async fn budget_explainer(
    State(client): State<AssistantClient>,
    Json(request): Json<BudgetExplainerRequest>,
) -> Result<Json<Value>, AppError> {
    let explanation = client
        .explain_budget(&request.procedure, &request.items)
        .await;
    Ok(Json(json!({ "explanation": explanation })))
}

#[axum::debug_handler]
pub async fn aftercare(
    State(client): State<AssistantClient>,
    Json(request): Json<AftercareRequest>,
) -> Result<Json<Value>, AppError> {
    let guidance = client
        .aftercare_guidance(&request.patient_name, &request.procedure)
        .await;
    Ok(Json(json!({ "guidance": guidance })))
}

/// Raw PCM bytes on success, 204 when synthesis is unavailable.
#[axum::debug_handler]
pub async fn speech(
    State(client): State<AssistantClient>,
    Json(request): Json<SpeechRequest>,
) -> Result<Response, AppError> {
    match client.synthesize_speech(&request.text).await {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "audio/pcm")], bytes).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
