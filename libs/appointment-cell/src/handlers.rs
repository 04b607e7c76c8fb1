use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_admin;

use crate::models::{CitaError, CreateCitaRequest, UpdateEstadoRequest};
use crate::services::booking::CitaBookingService;

fn map_cita_error(e: anyhow::Error) -> AppError {
    match e.downcast_ref::<CitaError>() {
        Some(CitaError::NotFound) => AppError::NotFound(
            "Cita no encontrada o no tienes permiso para verla".to_string(),
        ),
        Some(CitaError::InvalidEstado(estado)) => {
            AppError::BadRequest(format!("Estado no válido: {}", estado))
        }
        Some(CitaError::ValidationError(msg)) => AppError::BadRequest(msg.clone()),
        _ => AppError::Database(e.to_string()),
    }
}

/// Create a cita with its line items. Booking is open to unauthenticated
/// checkout; the atomic insert runs with the service's own credentials.
#[axum::debug_handler]
pub async fn create_cita(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateCitaRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = CitaBookingService::new(&state);
    let cita_id = service
        .create_cita(request, None)
        .await
        .map_err(map_cita_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "citaId": cita_id,
            "message": "Cita creada exitosamente"
        })),
    ))
}

/// Admin variant: same atomic insert, done on behalf of a client.
#[axum::debug_handler]
pub async fn create_cita_admin(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateCitaRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&user)?;

    let service = CitaBookingService::new(&state);
    let cita_id = service
        .create_cita(request, Some(auth.token()))
        .await
        .map_err(map_cita_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": cita_id,
            "message": "Cita creada exitosamente por el administrador"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_citas_admin(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CitaBookingService::new(&state);
    let citas = service
        .list_all(auth.token())
        .await
        .map_err(map_cita_error)?;

    Ok(Json(json!(citas)))
}

#[axum::debug_handler]
pub async fn get_cita(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(cita_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let usuario_id: i64 = user
        .id
        .parse()
        .map_err(|_| AppError::Auth("Invalid user id in token".to_string()))?;

    let service = CitaBookingService::new(&state);
    let cita = service
        .get_cita(cita_id, usuario_id, auth.token())
        .await
        .map_err(map_cita_error)?;

    Ok(Json(json!(cita)))
}

#[axum::debug_handler]
pub async fn update_cita_estado(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(cita_id): Path<i64>,
    Json(request): Json<UpdateEstadoRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CitaBookingService::new(&state);
    let estado = service
        .update_estado(cita_id, request, auth.token())
        .await
        .map_err(map_cita_error)?;

    Ok(Json(json!({ "message": format!("Cita marcada como {}", estado) })))
}
