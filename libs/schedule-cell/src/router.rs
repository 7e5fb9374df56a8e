// libs/schedule-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::booking::BookingService;

/// Staff console routes.
pub fn schedule_routes(booking: BookingService) -> Router {
    Router::new()
        .route("/appointments", post(handlers::create_appointment))
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments/{appointment_id}/status", post(handlers::update_status))
        .route(
            "/appointments/{appointment_id}/backfill",
            post(handlers::backfill_from_waitlist),
        )
        .route("/appointments/confirm-pending", post(handlers::confirm_all_pending))
        .route("/waitlist", get(handlers::get_waitlist))
        .route("/stats", get(handlers::get_stats))
        .with_state(booking)
}

/// Unauthenticated self-service flow, gated by the tax-identifier check.
pub fn public_routes(booking: BookingService) -> Router {
    Router::new()
        .route("/availability", get(handlers::get_availability))
        .route("/bookings", post(handlers::create_public_booking))
        .with_state(booking)
}
