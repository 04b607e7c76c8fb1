use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn cliente_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/perfil", get(handlers::get_perfil))
        .route("/perfil", put(handlers::update_perfil))
        .route("/direcciones", post(handlers::add_direccion))
        .route("/citas", get(handlers::get_mis_citas))
        .route("/citas/{cita_id}/cancelar", put(handlers::cancelar_cita))
        .route("/resenas", post(handlers::crear_resena))
        .route("/admin/clientes", get(handlers::get_all_clientes))
        .route(
            "/admin/clientes/{usuario_id}",
            delete(handlers::delete_cliente),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
