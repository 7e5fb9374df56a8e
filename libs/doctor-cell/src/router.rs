// libs/doctor-cell/src/router.rs
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{self, DoctorState};

pub fn doctor_routes(state: DoctorState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor))
        .route("/{doctor_id}", delete(handlers::remove_doctor))
        .route("/selected", get(handlers::get_selected))
        .route("/selected", put(handlers::set_selected))
        .with_state(state)
}
