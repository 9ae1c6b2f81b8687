use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::controllers::AssignmentController;
use crate::dto::api_response::ApiResponse;
use crate::dto::asignacion_dto::AsignarCamionesRequest;
use crate::middleware::JsonBody;
use crate::models::asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
use crate::models::dia_entrega::DiaEntrega;
use crate::models::entity::Entity;
use crate::routes::crud_routes::crud_router;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn create_dia_entrega_router() -> Router<AppState> {
    Router::new()
        .route("/con-camiones", get(list_con_camiones))
        .route("/:id/camiones", get(list_camiones).post(asignar_camiones))
        .merge(crud_router::<DiaEntrega>())
}

async fn list_con_camiones(
    State(controller): State<Arc<AssignmentController>>,
) -> AppResult<ApiResponse<Vec<EntityWithAssignments>>> {
    controller.list_all(AssignmentSide::DiaEntrega).await
}

async fn list_camiones(
    State(controller): State<Arc<AssignmentController>>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
    let id = parse_id(&raw_id, DiaEntrega::LABELS.invalid_id)?;
    controller.list(AssignmentSide::DiaEntrega, id).await
}

async fn asignar_camiones(
    State(controller): State<Arc<AssignmentController>>,
    Path(raw_id): Path<String>,
    JsonBody(request): JsonBody<AsignarCamionesRequest>,
) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
    let id = parse_id(&raw_id, DiaEntrega::LABELS.invalid_id)?;
    controller
        .replace(AssignmentSide::DiaEntrega, id, request.camiones_ids)
        .await
}
