use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::controllers::AssignmentController;
use crate::dto::api_response::ApiResponse;
use crate::dto::asignacion_dto::AsignarDiasRequest;
use crate::middleware::JsonBody;
use crate::models::asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
use crate::models::camion::Camion;
use crate::models::entity::Entity;
use crate::routes::crud_routes::crud_router;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn create_camion_router() -> Router<AppState> {
    Router::new()
        .route("/con-dias", get(list_con_dias))
        .route("/:id/dias", get(list_dias).post(asignar_dias))
        .merge(crud_router::<Camion>())
}

async fn list_con_dias(
    State(controller): State<Arc<AssignmentController>>,
) -> AppResult<ApiResponse<Vec<EntityWithAssignments>>> {
    controller.list_all(AssignmentSide::Camion).await
}

async fn list_dias(
    State(controller): State<Arc<AssignmentController>>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
    let id = parse_id(&raw_id, Camion::LABELS.invalid_id)?;
    controller.list(AssignmentSide::Camion, id).await
}

async fn asignar_dias(
    State(controller): State<Arc<AssignmentController>>,
    Path(raw_id): Path<String>,
    JsonBody(request): JsonBody<AsignarDiasRequest>,
) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
    let id = parse_id(&raw_id, Camion::LABELS.invalid_id)?;
    controller
        .replace(AssignmentSide::Camion, id, request.dias_ids)
        .await
}
