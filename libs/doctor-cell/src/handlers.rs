// libs/doctor-cell/src/handlers.rs
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use notification_cell::models::{NotificationCategory, NotificationKind};
use notification_cell::services::store::NotificationStore;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, SelectDoctorRequest, UpdateDoctorRequest};
use crate::services::roster::DoctorRoster;

#[derive(Clone)]
pub struct DoctorState {
    pub roster: DoctorRoster,
    pub notifications: NotificationStore,
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<DoctorState>) -> Result<Json<Value>, AppError> {
    let doctors = state.roster.list().await;
    Ok(Json(json!({
        "doctors": doctors,
        "selected": state.roster.selected().await,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<DoctorState>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.roster.add(request).await;

    state
        .notifications
        .record(
            format!("{} joined the clinical team.", doctor.name),
            NotificationKind::Success,
            None,
            NotificationCategory::General,
        )
        .await;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = state
        .roster
        .update(doctor_id, request)
        .await
        .ok_or_else(|| AppError::NotFound("Practitioner not found".to_string()))?;

    state
        .notifications
        .record(
            format!("{} updated successfully.", doctor.name),
            NotificationKind::Success,
            None,
            NotificationCategory::General,
        )
        .await;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn remove_doctor(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let Some(removed) = state.roster.remove(doctor_id).await else {
        // Absence of the target is not an error worth surfacing.
        return Ok(Json(json!({ "success": true })));
    };

    state
        .notifications
        .record(
            format!("{} removed from the team.", removed.name),
            NotificationKind::Warning,
            None,
            NotificationCategory::General,
        )
        .await;

    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn get_selected(State(state): State<DoctorState>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({ "selected": state.roster.selected().await })))
}

#[axum::debug_handler]
pub async fn set_selected(
    State(state): State<DoctorState>,
    Json(request): Json<SelectDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let applied = state.roster.set_selected(request.doctor_id).await;
    Ok(Json(json!({ "selected": applied })))
}
