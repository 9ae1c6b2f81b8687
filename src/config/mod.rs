//! Configuración del proyecto
//!
//! Variables de entorno del servidor y de la base de datos. Todo se lee a
//! través de una función de búsqueda para poder probarlo sin tocar el
//! entorno del proceso.

pub mod database;
pub mod environment;

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Variable de entorno requerida no definida: {0}")]
    Missing(&'static str),

    #[error("Valor inválido para {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Lee `name` y lo convierte; si no está definida devuelve `default`
pub(crate) fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
    }
}

/// Booleano tolerante: true/false, 1/0, yes/no, si/no
pub(crate) fn flag_or<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" | "si" | "sí" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}
