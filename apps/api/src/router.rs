// apps/api/src/router.rs
use axum::{routing::get, Router};

use budget_cell::router::budget_routes;
use doctor_cell::handlers::DoctorState;
use doctor_cell::router::doctor_routes;
use messaging_cell::handlers::MessagingState;
use messaging_cell::router::messaging_routes;
use notification_cell::router::notification_routes;
use patient_cell::handlers::PatientState;
use patient_cell::router::patient_routes;
use schedule_cell::router::{public_routes, schedule_routes};

use crate::clinic::{clinic_routes, ClinicState};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ClinicaPro API is running!" }))
        .nest("/notifications", notification_routes(state.notifications.clone()))
        .nest("/schedule", schedule_routes(state.booking.clone()))
        .nest("/public", public_routes(state.booking.clone()))
        .nest(
            "/doctors",
            doctor_routes(DoctorState {
                roster: state.doctors.clone(),
                notifications: state.notifications.clone(),
            }),
        )
        .nest(
            "/patients",
            patient_routes(PatientState {
                roster: state.patients.clone(),
                notifications: state.notifications.clone(),
            }),
        )
        .nest("/budgets", budget_routes(state.budgets.clone()))
        .nest(
            "/messaging",
            messaging_routes(MessagingState {
                client: state.whatsapp.clone(),
                sms: state.sms.clone(),
                notifications: state.notifications.clone(),
            }),
        )
        .nest("/assistant", assistant_cell::router::assistant_routes(state.assistant.clone()))
        .nest(
            "/clinic",
            clinic_routes(ClinicState {
                clinic: state.clinic.clone(),
                notifications: state.notifications.clone(),
            }),
        )
}
