// libs/notification-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::store::NotificationStore;

pub fn notification_routes(store: NotificationStore) -> Router {
    Router::new()
        .route("/feed", get(handlers::get_bell_feed))
        .route("/toasts", get(handlers::get_active_toasts))
        .route("/audit", get(handlers::get_audit_feed))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/ticker", get(handlers::get_ticker))
        .route("/{id}/dismiss-toast", post(handlers::dismiss_toast))
        .route("/{id}/dismiss", post(handlers::dismiss_from_bell))
        .route("/read-all", post(handlers::mark_all_read))
        .with_state(store)
}
