//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores de la aplicación, su traducción
//! desde los errores del driver de PostgreSQL y su conversión al sobre JSON
//! de error (`{ success: false, error, code, details?, timestamp }`).

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Código SQLSTATE de PostgreSQL para violación de unicidad
pub const PG_UNIQUE_VIOLATION: &str = "23505";
/// Código SQLSTATE de PostgreSQL para violación de clave foránea
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(true);

/// Activa o desactiva el detalle técnico en las respuestas de error 5xx.
/// En producción se desactiva al arrancar.
pub fn set_expose_internal_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

fn expose_internal_details() -> bool {
    EXPOSE_DETAILS.load(Ordering::Relaxed)
}

/// Tipo de conflicto, determina el status HTTP y el código del sobre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Violación de una restricción de unicidad (409)
    Duplicate,
    /// Borrado rechazado por el chequeo de uso de la aplicación (400)
    InUse,
    /// Violación de clave foránea reportada por la base de datos (400)
    Referential,
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    #[error("{message}: {}", .errors.join("; "))]
    ValidationFailed { message: String, errors: Vec<String> },

    #[error("No autorizado: {0}")]
    Unauthorized(String),

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("Conflicto: {message}")]
    Conflict { kind: ConflictKind, message: String },

    #[error("Servicio no disponible: {0}")]
    ServiceUnavailable(String),

    #[error("Error interno: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        AppError::ValidationFailed {
            message: message.into(),
            errors,
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        AppError::Conflict {
            kind: ConflictKind::Duplicate,
            message: message.into(),
        }
    }

    pub fn in_use(message: impl Into<String>) -> Self {
        AppError::Conflict {
            kind: ConflictKind::InUse,
            message: message.into(),
        }
    }

    pub fn referential(message: impl Into<String>) -> Self {
        AppError::Conflict {
            kind: ConflictKind::Referential,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) | AppError::ValidationFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { kind, .. } => match kind {
                ConflictKind::Duplicate => StatusCode::CONFLICT,
                ConflictKind::InUse | ConflictKind::Referential => StatusCode::BAD_REQUEST,
            },
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::ValidationFailed { .. } => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict { kind, .. } => match kind {
                ConflictKind::Duplicate => "DUPLICATE",
                ConflictKind::InUse => "IN_USE",
                ConflictKind::Referential => "REFERENTIAL",
            },
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Mensaje legible para el cliente y detalle opcional
    fn public_parts(&self) -> (String, Option<Value>) {
        match self {
            AppError::InvalidArgument(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => (msg.clone(), None),
            AppError::ValidationFailed { message, errors } => {
                (message.clone(), Some(json!(errors)))
            }
            AppError::Conflict { message, .. } => (message.clone(), None),
            AppError::ServiceUnavailable(detail) => (
                "No hay conexión a la base de datos".to_string(),
                expose_internal_details().then(|| json!(detail)),
            ),
            AppError::Internal(detail) => (
                "Error interno del servidor".to_string(),
                expose_internal_details().then(|| json!(detail)),
            ),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    AppError::duplicate("Ya existe un registro con esos datos")
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => AppError::referential(
                    "La operación viola una referencia entre tablas",
                ),
                _ => AppError::Internal(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => AppError::ServiceUnavailable(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

/// Sobre de error de la API
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "❌ {}", self);
        } else {
            tracing::warn!(code = self.code(), "⚠️ {}", self);
        }

        let (error, details) = self.public_parts();
        let body = ErrorResponse {
            success: false,
            error,
            code: self.code(),
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes_por_variante() {
        assert_eq!(
            AppError::InvalidArgument("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::duplicate("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::in_use("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::referential("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codigos_de_conflicto_distintos() {
        assert_eq!(AppError::duplicate("x").code(), "DUPLICATE");
        assert_eq!(AppError::in_use("x").code(), "IN_USE");
        assert_eq!(AppError::referential("x").code(), "REFERENTIAL");
    }

    #[test]
    fn test_pool_timeout_es_servicio_no_disponible() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_sobre_de_validacion_incluye_lista() {
        let err = AppError::validation(
            "Datos de cliente inválidos",
            vec!["El nombre es requerido".to_string()],
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Datos de cliente inválidos");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0], "El nombre es requerido");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_not_found_sin_detalles() {
        let body =
            body_json(AppError::NotFound("Camión no encontrado".into()).into_response()).await;
        assert_eq!(body["error"], "Camión no encontrado");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_credenciales_invalidas_es_401() {
        let response = AppError::Unauthorized("Credenciales inválidas".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Credenciales inválidas");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
