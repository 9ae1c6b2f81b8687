//! Sobre JSON uniforme de las respuestas exitosas
//!
//! Las respuestas de error se arman en `utils::errors`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadatos de paginación
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let limit = limit.max(1);
        let total = total.max(0);
        let total_pages = (total + limit - 1) / limit;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    /// 200 OK
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            pagination: None,
            timestamp: Utc::now(),
            status: StatusCode::OK,
        }
    }

    /// 201 Created
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data, message)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn paginated(items: Vec<T>, pagination: PaginationMeta, message: impl Into<String>) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(items, message)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let meta = PaginationMeta::new(3, 10, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);

        let vacia = PaginationMeta::new(1, 10, 0);
        assert_eq!(vacia.total_pages, 0);
        assert!(!vacia.has_next);
    }

    #[test]
    fn test_serializacion_camel_case() {
        let response = ApiResponse::paginated(vec![1, 2], PaginationMeta::new(1, 2, 4), "ok");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["hasNext"], true);
        assert!(json.get("status").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_created_usa_201() {
        let response = ApiResponse::created("x", "creado");
        assert_eq!(response.status(), StatusCode::CREATED);
        let sin_paginacion = serde_json::to_value(&response).unwrap();
        assert!(sin_paginacion.get("pagination").is_none());
    }
}
