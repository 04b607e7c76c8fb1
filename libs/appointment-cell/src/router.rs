use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn cita_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/admin", get(handlers::get_all_citas_admin))
        .route("/admin", post(handlers::create_cita_admin))
        .route("/admin/{cita_id}/status", put(handlers::update_cita_estado))
        .route("/{cita_id}", get(handlers::get_cita))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", post(handlers::create_cita))
        .merge(protected_routes)
        .with_state(state)
}
