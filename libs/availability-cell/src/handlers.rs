use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_admin;

use crate::models::{AvailabilityError, CreateBlockedRangeRequest};
use crate::services::availability::AvailabilityService;
use crate::services::blocks::BlockAdminService;

/// Public listing of every bookable slot in the rolling search window.
///
/// The clock is read exactly once here; the engine itself never touches
/// ambient time.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<DateTime<Utc>>>, AppError> {
    let now = Utc::now();

    let service = AvailabilityService::new(&state);
    let slots = service
        .get_available_slots(now)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn create_block(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateBlockedRangeRequest>,
) -> Result<(axum::http::StatusCode, Json<Value>), AppError> {
    require_admin(&user)?;

    let service = BlockAdminService::new(&state);
    let block = service
        .create_block(request, auth.token())
        .await
        .map_err(|e| match e.downcast_ref::<AvailabilityError>() {
            Some(AvailabilityError::InvalidRange(msg)) => AppError::BadRequest(msg.clone()),
            _ => AppError::Database(e.to_string()),
        })?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "bloqueo": block,
            "message": "Horario bloqueado exitosamente"
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_blocks(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = BlockAdminService::new(&state);
    let blocks = service
        .list_blocks(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!(blocks)))
}

#[axum::debug_handler]
pub async fn delete_block(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(block_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = BlockAdminService::new(&state);
    service
        .delete_block(block_id, auth.token())
        .await
        .map_err(|e| match e.downcast_ref::<AvailabilityError>() {
            Some(AvailabilityError::BlockNotFound) => {
                AppError::NotFound("Bloqueo no encontrado".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

    Ok(Json(json!({ "message": "Bloqueo eliminado exitosamente" })))
}
