// libs/schedule-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AvailabilityQuery, CreateAppointmentRequest, PublicBookingRequest, ScheduleError,
    ScheduleQuery, UpdateStatusRequest,
};
use crate::services::booking::BookingService;

fn map_schedule_error(err: ScheduleError) -> AppError {
    match err {
        ScheduleError::SlotConflict { .. } => AppError::Conflict(err.to_string()),
        ScheduleError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
        ScheduleError::ConfirmationInFlight => AppError::Conflict(err.to_string()),
        ScheduleError::Validation(message) => AppError::ValidationError(message),
        ScheduleError::NotFound => AppError::NotFound(err.to_string()),
        ScheduleError::EmptyWaitlist => AppError::BadRequest(err.to_string()),
    }
}

// ==============================================================================
// STAFF CONSOLE
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment(
    State(booking): State<BookingService>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking
        .create_appointment(request)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(booking): State<BookingService>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking.registry().schedule(query.date, query.doctor_id).await;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn update_status(
    State(booking): State<BookingService>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    match booking
        .update_status(appointment_id, request.status)
        .await
        .map_err(map_schedule_error)?
    {
        Some(appointment) => Ok(Json(json!(appointment))),
        // Absence of the target is not contention over it.
        None => Ok(Json(json!({ "success": true }))),
    }
}

#[axum::debug_handler]
pub async fn backfill_from_waitlist(
    State(booking): State<BookingService>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    match booking.fill_slot_from_waitlist(appointment_id).await {
        Ok(appointment) => Ok(Json(json!({ "filled": true, "appointment": appointment }))),
        Err(ScheduleError::EmptyWaitlist) => Ok(Json(json!({ "filled": false }))),
        Err(ScheduleError::NotFound) => Ok(Json(json!({ "filled": false }))),
        Err(err) => Err(map_schedule_error(err)),
    }
}

#[axum::debug_handler]
pub async fn confirm_all_pending(
    State(booking): State<BookingService>,
) -> Result<Json<Value>, AppError> {
    let count = booking
        .confirm_all_pending()
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({ "confirmed": count })))
}

#[axum::debug_handler]
pub async fn get_waitlist(State(booking): State<BookingService>) -> Result<Json<Value>, AppError> {
    let entries = booking.waitlist().entries().await;

    Ok(Json(json!({
        "waitlist": entries,
        "total": entries.len()
    })))
}

#[axum::debug_handler]
pub async fn get_stats(State(booking): State<BookingService>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!(booking.registry().stats().await)))
}

// ==============================================================================
// PUBLIC BOOKING FLOW
// ==============================================================================

#[axum::debug_handler]
pub async fn get_availability(
    State(booking): State<BookingService>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = booking.availability(query.doctor_id, query.date).await;
    Ok(Json(json!({ "slots": slots })))
}

#[axum::debug_handler]
pub async fn create_public_booking(
    State(booking): State<BookingService>,
    Json(request): Json<PublicBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking
        .create_public_booking(request)
        .await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
