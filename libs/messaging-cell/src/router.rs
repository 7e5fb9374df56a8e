// libs/messaging-cell/src/router.rs
use axum::{routing::post, Router};

use crate::handlers::{self, MessagingState};

pub fn messaging_routes(state: MessagingState) -> Router {
    Router::new()
        .route("/test", post(handlers::test_connectivity))
        .route("/manual-link", post(handlers::manual_link))
        .route("/reminder", post(handlers::appointment_reminder))
        .route("/sms-reminder", post(handlers::sms_reminder))
        .with_state(state)
}
