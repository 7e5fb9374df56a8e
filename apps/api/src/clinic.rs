// apps/api/src/clinic.rs
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use notification_cell::models::{NotificationCategory, NotificationKind};
use notification_cell::services::store::NotificationStore;
use shared_models::clinic::{ClinicProfile, UpdateClinicProfileRequest, MAX_LOGO_BYTES};
use shared_models::error::AppError;

#[derive(Clone)]
pub struct ClinicState {
    pub clinic: Arc<RwLock<ClinicProfile>>,
    pub notifications: NotificationStore,
}

pub fn clinic_routes(state: ClinicState) -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
        .with_state(state)
}

#[axum::debug_handler]
async fn get_profile(State(state): State<ClinicState>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!(state.clinic.read().await.clone())))
}

#[axum::debug_handler]
async fn update_profile(
    State(state): State<ClinicState>,
    Json(request): Json<UpdateClinicProfileRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(logo_url) = request.logo_url.as_deref() {
        // Inlined data-URL logos are capped; oversized uploads are refused.
        if logo_url.len() > MAX_LOGO_BYTES {
            state
                .notifications
                .record(
                    "Image too large. Maximum 2MB.",
                    NotificationKind::Warning,
                    None,
                    NotificationCategory::General,
                )
                .await;
            return Err(AppError::ValidationError(
                "Logo exceeds the 2MB limit".to_string(),
            ));
        }
    }

    let logo_changed = request.logo_url.is_some();
    let mut clinic = state.clinic.write().await;
    if let Some(clinic_name) = request.clinic_name {
        clinic.clinic_name = clinic_name;
    }
    if let Some(logo_url) = request.logo_url {
        clinic.logo_url = logo_url;
    }
    if let Some(primary_color) = request.primary_color {
        clinic.primary_color = primary_color;
    }
    if let Some(accent_color) = request.accent_color {
        clinic.accent_color = accent_color;
    }
    if let Some(kind) = request.kind {
        clinic.kind = kind;
    }
    let updated = clinic.clone();
    drop(clinic);

    if logo_changed {
        state
            .notifications
            .record(
                "Logo updated!",
                NotificationKind::Success,
                None,
                NotificationCategory::General,
            )
            .await;
    }

    Ok(Json(json!(updated)))
}
