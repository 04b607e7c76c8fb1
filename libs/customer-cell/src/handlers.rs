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

use crate::models::{AddDireccionRequest, ClienteError, CreateResenaRequest, UpdatePerfilRequest};
use crate::services::citas::ClienteCitaService;
use crate::services::clients::ClienteAdminService;
use crate::services::profile::ProfileService;

fn map_cliente_error(e: anyhow::Error) -> AppError {
    match e.downcast_ref::<ClienteError>() {
        Some(ClienteError::UsuarioNotFound) => {
            AppError::NotFound("Usuario no encontrado".to_string())
        }
        Some(ClienteError::CitaNotFound) => AppError::NotFound(
            "Cita no encontrada o no se puede modificar".to_string(),
        ),
        Some(ClienteError::CitaNotCompleted) => AppError::BadRequest(
            "Solo se pueden reseñar citas completadas".to_string(),
        ),
        Some(ClienteError::AlreadyReviewed) => {
            AppError::Conflict("Esta cita ya ha sido reseñada".to_string())
        }
        Some(ClienteError::ClienteNotFound) => {
            AppError::NotFound("Cliente no encontrado".to_string())
        }
        Some(ClienteError::ClienteHasCitas) => AppError::Conflict(
            "No se puede eliminar el cliente porque tiene citas asociadas".to_string(),
        ),
        Some(ClienteError::ValidationError(msg)) => AppError::BadRequest(msg.clone()),
        _ => AppError::Database(e.to_string()),
    }
}

fn own_id(user: &User) -> Result<i64, AppError> {
    user.id
        .parse()
        .map_err(|_| AppError::Auth("Invalid user id in token".to_string()))
}

#[axum::debug_handler]
pub async fn get_perfil(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let usuario_id = own_id(&user)?;

    let service = ProfileService::new(&state);
    let perfil = service
        .get_perfil(usuario_id, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!(perfil)))
}

#[axum::debug_handler]
pub async fn update_perfil(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePerfilRequest>,
) -> Result<Json<Value>, AppError> {
    let usuario_id = own_id(&user)?;

    let service = ProfileService::new(&state);
    service
        .update_perfil(usuario_id, request, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!({ "message": "Perfil actualizado exitosamente" })))
}

#[axum::debug_handler]
pub async fn add_direccion(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<AddDireccionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let usuario_id = own_id(&user)?;

    let service = ProfileService::new(&state);
    let direccion = service
        .add_direccion(usuario_id, request, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok((StatusCode::CREATED, Json(json!(direccion))))
}

#[axum::debug_handler]
pub async fn get_mis_citas(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let usuario_id = own_id(&user)?;

    let service = ClienteCitaService::new(&state);
    let citas = service
        .get_mis_citas(usuario_id, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!(citas)))
}

#[axum::debug_handler]
pub async fn cancelar_cita(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(cita_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let usuario_id = own_id(&user)?;

    let service = ClienteCitaService::new(&state);
    service
        .cancelar_cita(cita_id, usuario_id, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!({ "message": "Cita cancelada exitosamente" })))
}

#[axum::debug_handler]
pub async fn crear_resena(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateResenaRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let usuario_id = own_id(&user)?;

    let service = ClienteCitaService::new(&state);
    service
        .crear_resena(usuario_id, request, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reseña enviada. Será visible tras su aprobación." })),
    ))
}

#[axum::debug_handler]
pub async fn get_all_clientes(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = ClienteAdminService::new(&state);
    let clientes = service
        .list_clientes(auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!(clientes)))
}

#[axum::debug_handler]
pub async fn delete_cliente(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(usuario_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = ClienteAdminService::new(&state);
    service
        .delete_cliente(usuario_id, auth.token())
        .await
        .map_err(map_cliente_error)?;

    Ok(Json(json!({ "message": "Cliente eliminado exitosamente" })))
}
