//! Extractores que convierten los rechazos de axum en el sobre de error
//! de la API en lugar del texto plano por defecto.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::AppError;
use crate::utils::validation::validation_messages;

/// Igual que `axum::Json<T>` pero rechaza con `INVALID_ARGUMENT`
#[derive(Debug, Clone, Copy)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(JsonBody(payload)),
            Err(rejection) => Err(AppError::InvalidArgument(format!(
                "Cuerpo de la petición inválido: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Query string deserializado y validado con `validator`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::InvalidArgument(format!(
                    "Parámetros de consulta inválidos: {}",
                    rejection.body_text()
                ))
            })?;

        query.validate().map_err(|errors| {
            AppError::validation(
                "Parámetros de consulta inválidos",
                validation_messages(&errors),
            )
        })?;

        Ok(ValidatedQuery(query))
    }
}
