//! Chequeos de salud: `/health` prueba la persistencia y mide la latencia;
//! `/ping` sólo confirma que el proceso responde.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::dto::api_response::ApiResponse;
use crate::repositories::store::StoreHealth;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthServices {
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// Segundos desde el arranque
    pub uptime: f64,
    pub environment: String,
    pub services: HealthServices,
}

#[derive(Debug, Serialize)]
pub struct PingDatabase {
    pub configured: bool,
    pub connected: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PingReport {
    pub status: &'static str,
    pub timestamp: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PingDatabase>,
}

pub struct HealthController {
    store: Arc<dyn StoreHealth>,
    environment: String,
    started_at: Instant,
}

impl HealthController {
    pub fn new(store: Arc<dyn StoreHealth>, environment: impl Into<String>) -> Self {
        Self {
            store,
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }

    pub async fn health(&self) -> Response {
        let database = match self.store.ping().await {
            Ok(latency) => DatabaseHealth {
                status: "healthy",
                backend: self.store.backend(),
                response_time: Some(format!("{}ms", latency.as_millis())),
                error: None,
            },
            Err(err) => {
                tracing::error!("❌ Chequeo de base de datos fallido: {}", err);
                DatabaseHealth {
                    status: "unhealthy",
                    backend: self.store.backend(),
                    response_time: None,
                    error: Some(err.to_string()),
                }
            }
        };
        let healthy = database.error.is_none();
        let report = HealthReport {
            uptime: self.started_at.elapsed().as_secs_f64(),
            environment: self.environment.clone(),
            services: HealthServices { database },
        };

        if healthy {
            ApiResponse::success(report, "✅ Sistema completamente saludable").into_response()
        } else {
            let body = json!({
                "success": false,
                "error": "⚠️ Sistema con problemas",
                "code": "SERVICE_UNAVAILABLE",
                "details": report,
                "timestamp": Utc::now().to_rfc3339(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }

    pub async fn ping(&self, check_database: bool) -> PingReport {
        let database = if check_database {
            let result = self.store.ping().await;
            Some(PingDatabase {
                configured: true,
                connected: result.is_ok(),
                error: result.err().map(|err| err.to_string()),
            })
        } else {
            None
        };

        PingReport {
            status: "ok",
            timestamp: Utc::now().to_rfc3339(),
            environment: self.environment.clone(),
            database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory_repository::MemoryStore;

    #[tokio::test]
    async fn test_ping_con_base_de_datos() {
        let controller = HealthController::new(Arc::new(MemoryStore::new()), "test");
        let report = controller.ping(true).await;
        let database = report.database.unwrap();
        assert!(database.connected);
        assert!(database.error.is_none());

        assert!(controller.ping(false).await.database.is_none());
    }

    #[tokio::test]
    async fn test_health_sano() {
        let controller = HealthController::new(Arc::new(MemoryStore::new()), "test");
        assert_eq!(controller.health().await.status(), StatusCode::OK);
    }
}
