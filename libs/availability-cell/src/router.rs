use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    // Slot listing is public; blocked-range administration requires auth
    // (admin role enforced in the handlers).
    let admin_routes = Router::new()
        .route("/bloqueos", post(handlers::create_block))
        .route("/bloqueos", get(handlers::list_blocks))
        .route("/bloqueos/{block_id}", delete(handlers::delete_block))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(handlers::get_availability))
        .merge(admin_routes)
        .with_state(state)
}
