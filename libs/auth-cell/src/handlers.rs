use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AuthError, LoginRequest, RegisterRequest};
use crate::services::account::AccountService;

fn map_auth_error(e: anyhow::Error) -> AppError {
    match e.downcast_ref::<AuthError>() {
        Some(AuthError::InvalidCredentials) => {
            AppError::Auth("Credenciales inválidas".to_string())
        }
        Some(AuthError::EmailTaken) => {
            AppError::Conflict("El correo electrónico ya está registrado".to_string())
        }
        Some(AuthError::ValidationError(msg)) => AppError::BadRequest(msg.clone()),
        _ => AppError::Internal(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AccountService::new(&state);
    let id = service.register(request).await.map_err(map_auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Usuario registrado exitosamente"
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    let response = service.login(request).await.map_err(map_auth_error)?;

    Ok(Json(json!(response)))
}
