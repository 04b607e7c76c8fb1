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

use crate::models::{
    AddOpcionRequest, AddVariacionRequest, CatalogError, CreateServicioRequest,
    UpdateServicioRequest,
};
use crate::services::catalog::CatalogService;

fn map_catalog_error(e: anyhow::Error) -> AppError {
    match e.downcast_ref::<CatalogError>() {
        Some(CatalogError::ServiceNotFound) => {
            AppError::NotFound("Servicio no encontrado".to_string())
        }
        Some(CatalogError::ServiceInUse) => AppError::Conflict(
            "No se puede eliminar el servicio porque está asociado a citas existentes".to_string(),
        ),
        Some(CatalogError::ValidationError(msg)) => AppError::BadRequest(msg.clone()),
        _ => AppError::Database(e.to_string()),
    }
}

/// Public catalog: active services with nested opciones and variaciones.
#[axum::debug_handler]
pub async fn get_servicios(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(&state);
    let catalog = service.list_active().await.map_err(map_catalog_error)?;

    Ok(Json(json!(catalog)))
}

#[axum::debug_handler]
pub async fn get_servicios_admin(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    let catalog = service
        .list_all(auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!(catalog)))
}

#[axum::debug_handler]
pub async fn create_servicio(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateServicioRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    let id = service
        .create_servicio(request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Servicio creado exitosamente"
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_servicio(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(servicio_id): Path<i64>,
    Json(request): Json<UpdateServicioRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    service
        .update_servicio(servicio_id, request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "message": "Servicio actualizado exitosamente" })))
}

#[axum::debug_handler]
pub async fn deactivate_servicio(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(servicio_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    service
        .deactivate_servicio(servicio_id, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "message": "Servicio desactivado exitosamente" })))
}

#[axum::debug_handler]
pub async fn delete_servicio(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(servicio_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    service
        .delete_servicio(servicio_id, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({ "message": "Servicio eliminado permanentemente" })))
}

#[axum::debug_handler]
pub async fn add_opcion(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(servicio_id): Path<i64>,
    Json(request): Json<AddOpcionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    let id = service
        .add_opcion(servicio_id, request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Opción añadida exitosamente"
        })),
    ))
}

#[axum::debug_handler]
pub async fn add_variacion(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(opcion_id): Path<i64>,
    Json(request): Json<AddVariacionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_admin(&user)?;

    let service = CatalogService::new(&state);
    let id = service
        .add_variacion(opcion_id, request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": "Variación de precio añadida exitosamente"
        })),
    ))
}
