//! Routers de la API
//!
//! Los recursos se montan en la raíz y también bajo `/api`.

pub mod camion_routes;
pub mod cliente_routes;
pub mod crud_routes;
pub mod dia_entrega_routes;
pub mod health_routes;
pub mod usuario_routes;

use axum::{extract::Request, http::Uri, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::middleware::cors_layer;
use crate::state::AppState;
use crate::utils::errors::AppError;

fn resource_routes() -> Router<AppState> {
    Router::new()
        .nest("/clientes", cliente_routes::create_cliente_router())
        .nest("/camiones", camion_routes::create_camion_router())
        .nest("/dias-entrega", dia_entrega_routes::create_dia_entrega_router())
        .nest("/usuarios", usuario_routes::create_usuario_router())
        .merge(health_routes::create_health_router())
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Ruta no encontrada: {}", uri.path()))
}

/// Router completo con middleware y estado
pub fn create_app(state: AppState) -> Router {
    let resources = resource_routes();
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(cors_layer(&state.config.cors_origins));

    Router::new()
        .merge(resources.clone())
        .nest("/api", resources)
        .fallback(route_not_found)
        .layer(middleware)
        .with_state(state)
}
