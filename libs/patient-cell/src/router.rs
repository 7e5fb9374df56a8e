// libs/patient-cell/src/router.rs
use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{self, PatientState};

pub fn patient_routes(state: PatientState) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients))
        .route("/", post(handlers::create_patient))
        .route("/{patient_id}", put(handlers::update_patient))
        .route("/{patient_id}/view", post(handlers::record_view))
        .route("/{patient_id}/notes", put(handlers::save_notes))
        .with_state(state)
}
