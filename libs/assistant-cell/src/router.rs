// libs/assistant-cell/src/router.rs
use axum::{routing::post, Router};

use crate::handlers;
use crate::services::client::AssistantClient;

pub fn assistant_routes(client: AssistantClient) -> Router {
    Router::new()
        .route("/budget-explainer", post(handlers::budget_explainer))
        .route("/aftercare", post(handlers::aftercare))
        .route("/speech", post(handlers::speech))
        .with_state(client)
}
