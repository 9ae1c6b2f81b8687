//! Router CRUD genérico: `/`, `/:id` para cualquier `Entity`

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    routing::get,
    Router,
};

use crate::controllers::CrudController;
use crate::dto::api_response::ApiResponse;
use crate::dto::list_dto::ListQuery;
use crate::middleware::{JsonBody, ValidatedQuery};
use crate::models::entity::Entity;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn crud_router<E>() -> Router<AppState>
where
    E: Entity,
    Arc<CrudController<E>>: FromRef<AppState>,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route(
            "/:id",
            get(get_one::<E>)
                .put(update::<E>)
                .patch(patch::<E>)
                .delete(remove::<E>),
        )
}

pub(crate) async fn list<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<ApiResponse<Vec<E>>> {
    controller.list(&query).await
}

pub(crate) async fn get_one<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<E>> {
    let id = parse_id(&raw_id, E::LABELS.invalid_id)?;
    controller.get_by_id(id).await
}

async fn create<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    JsonBody(payload): JsonBody<E::Payload>,
) -> AppResult<ApiResponse<E>> {
    controller.create(payload).await
}

pub(crate) async fn update<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<E::Payload>,
) -> AppResult<ApiResponse<E>> {
    let id = parse_id(&raw_id, E::LABELS.invalid_id)?;
    controller.update(id, payload).await
}

pub(crate) async fn patch<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    Path(raw_id): Path<String>,
    JsonBody(patch): JsonBody<E::Patch>,
) -> AppResult<ApiResponse<E>> {
    let id = parse_id(&raw_id, E::LABELS.invalid_id)?;
    controller.patch(id, patch).await
}

pub(crate) async fn remove<E: Entity>(
    State(controller): State<Arc<CrudController<E>>>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<E>> {
    let id = parse_id(&raw_id, E::LABELS.invalid_id)?;
    controller.delete(id).await
}
