//! Middleware del sistema
//!
//! CORS y extractores con rechazo en formato de la API.

pub mod cors;
pub mod extractors;

pub use cors::cors_layer;
pub use extractors::{JsonBody, ValidatedQuery};
