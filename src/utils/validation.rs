//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos, usadas por los validadores de cada entidad.

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::{AppError, AppResult};

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Convertir el id recibido en la ruta en un entero positivo
pub fn parse_id(raw: &str, message: &str) -> AppResult<i32> {
    let id: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidArgument(message.to_string()))?;
    validate_positive(id).map_err(|_| AppError::InvalidArgument(message.to_string()))?;
    Ok(id)
}

/// Acumulador de mensajes de validación en el orden en que se detectan
#[derive(Debug, Default)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    /// Registra `message` si `value` falta o está en blanco
    pub fn required(&mut self, value: Option<&str>, message: &str) {
        if value.map_or(true, |v| validate_not_empty(v).is_err()) {
            self.push(message);
        }
    }

    /// Registra `message` si `value` supera `max` caracteres
    pub fn max_length(&mut self, value: Option<&str>, max: usize, message: &str) {
        if let Some(value) = value {
            if validate_length(value, 0, max).is_err() {
                self.push(message);
            }
        }
    }

    /// Registra `message` si `value` tiene menos de `min` caracteres
    pub fn min_length(&mut self, value: Option<&str>, min: usize, message: &str) {
        if let Some(value) = value {
            if value.chars().count() < min {
                self.push(message);
            }
        }
    }

    /// Registra `message` si `value` no tiene forma de email
    pub fn email(&mut self, value: Option<&str>, message: &str) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !validator::validate_email(value) {
                self.push(message);
            }
        }
    }

    /// Registra `message` si `value` es no finito o cae fuera de `[min, max]`
    pub fn coordinate(&mut self, value: Option<f64>, min: f64, max: f64, message: &str) {
        if let Some(value) = value {
            if !value.is_finite() || validate_range(value, min, max).is_err() {
                self.push(message);
            }
        }
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Aplanar los errores del derive `Validate` en mensajes legibles,
/// ordenados por campo para que la respuesta sea estable
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, error.code),
            })
        })
        .collect()
}
