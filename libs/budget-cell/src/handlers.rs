// libs/budget-cell/src/handlers.rs
use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::ApproveBudgetRequest;
use crate::services::approval::BudgetService;

#[axum::debug_handler]
pub async fn approve_budget(
    State(service): State<BudgetService>,
    Json(request): Json<ApproveBudgetRequest>,
) -> Result<Json<Value>, AppError> {
    let approval = service.approve(request).await;

    Ok(Json(json!({
        "success": true,
        "approval": approval
    })))
}
