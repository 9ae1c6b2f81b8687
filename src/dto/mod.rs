//! DTOs de entrada y salida de la API

pub mod api_response;
pub mod asignacion_dto;
pub mod camion_dto;
pub mod cliente_dto;
pub mod dia_entrega_dto;
pub mod list_dto;
pub mod usuario_dto;

use serde::{Deserialize, Deserializer};

/// Distingue en un PATCH el campo ausente (`None`) del campo enviado como
/// `null` (`Some(None)`). Se usa junto a `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Recorta un texto opcional y descarta el resultado vacío
pub(crate) fn normalize_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
