use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};

use crate::controllers::UsuarioController;
use crate::dto::api_response::ApiResponse;
use crate::dto::usuario_dto::{CambiarPasswordRequest, CrearUsuarioRequest, LoginRequest};
use crate::middleware::JsonBody;
use crate::models::entity::Entity;
use crate::models::usuario::{Usuario, UsuarioStats};
use crate::routes::crud_routes::{get_one, list, patch, remove, update};
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

/// El alta no es la genérica: hashea la contraseña antes de guardar
pub fn create_usuario_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<Usuario>).post(create_usuario))
        .route("/users", get(list::<Usuario>))
        .route("/stats", get(get_stats))
        .route("/login", post(login))
        .route(
            "/:id",
            get(get_one::<Usuario>)
                .put(update::<Usuario>)
                .patch(patch::<Usuario>)
                .delete(remove::<Usuario>),
        )
        .route("/:id/password", put(cambiar_password))
}

async fn create_usuario(
    State(controller): State<Arc<UsuarioController>>,
    JsonBody(request): JsonBody<CrearUsuarioRequest>,
) -> AppResult<ApiResponse<Usuario>> {
    controller.create(request).await
}

async fn login(
    State(controller): State<Arc<UsuarioController>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<ApiResponse<Usuario>> {
    controller.login(request).await
}

async fn cambiar_password(
    State(controller): State<Arc<UsuarioController>>,
    Path(raw_id): Path<String>,
    JsonBody(request): JsonBody<CambiarPasswordRequest>,
) -> AppResult<ApiResponse<Usuario>> {
    let id = parse_id(&raw_id, Usuario::LABELS.invalid_id)?;
    controller.cambiar_password(id, request).await
}

async fn get_stats(
    State(controller): State<Arc<UsuarioController>>,
) -> AppResult<ApiResponse<UsuarioStats>> {
    controller.stats().await
}
