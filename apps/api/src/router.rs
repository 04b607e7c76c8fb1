use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::cita_routes;
use auth_cell::router::auth_routes;
use availability_cell::router::availability_routes;
use catalog_cell::router::catalog_routes;
use customer_cell::router::cliente_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Lavadero API is running!" }))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/servicios", catalog_routes(state.clone()))
        .nest("/api/citas", cita_routes(state.clone()))
        .nest("/api/disponibilidad", availability_routes(state.clone()))
        .nest("/api/cliente", cliente_routes(state.clone()))
}
