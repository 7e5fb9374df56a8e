// libs/notification-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::AuditQuery;
use crate::services::store::NotificationStore;

#[axum::debug_handler]
pub async fn get_bell_feed(State(store): State<NotificationStore>) -> Result<Json<Value>, AppError> {
    let feed = store.bell_feed().await;
    let unread = store.unread_count().await;

    Ok(Json(json!({
        "notifications": feed,
        "unread": unread
    })))
}

#[axum::debug_handler]
pub async fn get_active_toasts(
    State(store): State<NotificationStore>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({ "toasts": store.active_toasts().await })))
}

#[axum::debug_handler]
pub async fn get_audit_feed(
    State(store): State<NotificationStore>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Value>, AppError> {
    let entries = store.audit_feed(query.search.as_deref(), query.kind).await;

    Ok(Json(json!({
        "entries": entries,
        "total": entries.len()
    })))
}

#[axum::debug_handler]
pub async fn get_unread_count(
    State(store): State<NotificationStore>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({ "unread": store.unread_count().await })))
}

#[axum::debug_handler]
pub async fn get_ticker(State(store): State<NotificationStore>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "ticker": store.ticker().await,
        "budget_pulse": store.budget_pulse().await
    })))
}

#[axum::debug_handler]
pub async fn dismiss_toast(
    State(store): State<NotificationStore>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    store.dismiss_toast(id).await;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn dismiss_from_bell(
    State(store): State<NotificationStore>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    store.dismiss_from_bell(id).await;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(store): State<NotificationStore>,
) -> Result<Json<Value>, AppError> {
    store.mark_all_read().await;
    Ok(Json(json!({ "success": true })))
}
