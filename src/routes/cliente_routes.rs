use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::controllers::ClienteController;
use crate::dto::api_response::ApiResponse;
use crate::models::cliente::{Cliente, Ubicacion};
use crate::models::entity::Entity;
use crate::routes::crud_routes::crud_router;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn create_cliente_router() -> Router<AppState> {
    Router::new()
        .route("/activos", get(list_activos))
        .route("/con-ubicacion", get(list_con_ubicacion))
        .route("/:id/ubicacion", get(get_ubicacion))
        .merge(crud_router::<Cliente>())
}

async fn list_activos(
    State(controller): State<Arc<ClienteController>>,
) -> AppResult<ApiResponse<Vec<Cliente>>> {
    controller.activos().await
}

async fn list_con_ubicacion(
    State(controller): State<Arc<ClienteController>>,
) -> AppResult<ApiResponse<Vec<Cliente>>> {
    controller.con_ubicacion().await
}

async fn get_ubicacion(
    State(controller): State<Arc<ClienteController>>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<Ubicacion>> {
    let id = parse_id(&raw_id, Cliente::LABELS.invalid_id)?;
    controller.ubicacion(id).await
}
