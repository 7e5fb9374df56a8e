// libs/budget-cell/src/router.rs
use axum::{routing::post, Router};

use crate::handlers;
use crate::services::approval::BudgetService;

pub fn budget_routes(service: BudgetService) -> Router {
    Router::new()
        .route("/approve", post(handlers::approve_budget))
        .with_state(service)
}
