use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::health_controller::{HealthController, PingReport};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PingQuery {
    pub db: Option<String>,
}

impl PingQuery {
    fn check_database(&self) -> bool {
        matches!(self.db.as_deref(), Some("true") | Some("1"))
    }
}

pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ping", get(ping))
}

async fn health(State(controller): State<Arc<HealthController>>) -> Response {
    controller.health().await
}

async fn ping(
    State(controller): State<Arc<HealthController>>,
    Query(query): Query<PingQuery>,
) -> Json<PingReport> {
    Json(controller.ping(query.check_database()).await)
}
