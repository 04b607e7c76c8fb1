use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    // Catalog browsing is public; everything else is admin-only (role
    // enforced in the handlers).
    let admin_routes = Router::new()
        .route("/admin", get(handlers::get_servicios_admin))
        .route("/", post(handlers::create_servicio))
        .route("/{servicio_id}", put(handlers::update_servicio))
        .route("/{servicio_id}", delete(handlers::deactivate_servicio))
        .route("/{servicio_id}/permanente", delete(handlers::delete_servicio))
        .route("/{servicio_id}/opciones", post(handlers::add_opcion))
        .route("/opciones/{opcion_id}/variaciones", post(handlers::add_variacion))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(handlers::get_servicios))
        .merge(admin_routes)
        .with_state(state)
}
