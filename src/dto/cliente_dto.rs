use serde::Deserialize;

use crate::dto::{double_option, normalize_text};
use crate::models::entity::{ChangeSet, FieldChange};
use crate::validators::cliente::{validate_cliente, validate_cliente_patch};

/// Body de POST /clientes y PUT /clientes/:id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientePayload {
    #[serde(alias = "codigo_alternativo")]
    pub codigo_alternativo: Option<String>,
    pub nombre: Option<String>,
    pub razon: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub rut: Option<String>,
    pub activo: Option<bool>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ChangeSet for ClientePayload {
    fn validation_errors(&self) -> Vec<String> {
        validate_cliente(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        vec![
            FieldChange::text("codigo_alternativo", normalize_text(&self.codigo_alternativo)),
            FieldChange::text("nombre", normalize_text(&self.nombre)),
            FieldChange::text("razon", self.razon.clone()),
            FieldChange::text("direccion", self.direccion.clone()),
            FieldChange::text("telefono", self.telefono.clone()),
            FieldChange::text("rut", self.rut.clone()),
            FieldChange::boolean("activo", self.activo.unwrap_or(true)),
            FieldChange::float("x", self.x),
            FieldChange::float("y", self.y),
        ]
    }
}

/// Body de PATCH /clientes/:id. Sólo los campos presentes se modifican;
/// `null` limpia los campos opcionales.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientePatch {
    #[serde(default, alias = "codigo_alternativo", deserialize_with = "double_option")]
    pub codigo_alternativo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub nombre: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub razon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub direccion: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub telefono: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rut: Option<Option<String>>,
    #[serde(default)]
    pub activo: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub x: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub y: Option<Option<f64>>,
}

impl ChangeSet for ClientePatch {
    fn validation_errors(&self) -> Vec<String> {
        validate_cliente_patch(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        if let Some(value) = &self.codigo_alternativo {
            changes.push(FieldChange::text("codigo_alternativo", normalize_text(value)));
        }
        if let Some(value) = &self.nombre {
            changes.push(FieldChange::text("nombre", normalize_text(value)));
        }
        let optional_texts = [
            ("razon", &self.razon),
            ("direccion", &self.direccion),
            ("telefono", &self.telefono),
            ("rut", &self.rut),
        ];
        for (column, value) in optional_texts {
            if let Some(value) = value {
                changes.push(FieldChange::text(column, value.clone()));
            }
        }
        if let Some(activo) = self.activo {
            changes.push(FieldChange::boolean("activo", activo));
        }
        if let Some(x) = self.x {
            changes.push(FieldChange::float("x", x));
        }
        if let Some(y) = self.y {
            changes.push(FieldChange::float("y", y));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::FieldValue;

    #[test]
    fn test_payload_acepta_snake_case_y_camel_case() {
        let camel: ClientePayload =
            serde_json::from_str(r#"{"nombre":"A","codigoAlternativo":"C-1"}"#).unwrap();
        let snake: ClientePayload =
            serde_json::from_str(r#"{"nombre":"A","codigo_alternativo":"C-1"}"#).unwrap();
        assert_eq!(camel.codigo_alternativo.as_deref(), Some("C-1"));
        assert_eq!(snake.codigo_alternativo.as_deref(), Some("C-1"));
    }

    #[test]
    fn test_payload_activo_por_defecto() {
        let payload: ClientePayload = serde_json::from_str(r#"{"nombre":" Empresa "}"#).unwrap();
        let changes = payload.changes();
        assert_eq!(changes.len(), 9);
        assert!(changes.contains(&FieldChange::boolean("activo", true)));
        assert!(changes.contains(&FieldChange::text("nombre", Some("Empresa".into()))));
    }

    #[test]
    fn test_patch_solo_campos_presentes() {
        let patch: ClientePatch =
            serde_json::from_str(r#"{"telefono":"+56 9 1111","x":null,"desconocido":1}"#).unwrap();
        let changes = patch.changes();
        assert_eq!(
            changes,
            vec![
                FieldChange::text("telefono", Some("+56 9 1111".into())),
                FieldChange {
                    column: "x",
                    value: FieldValue::Float(None)
                },
            ]
        );
    }

    #[test]
    fn test_patch_sin_campos_reconocidos_esta_vacio() {
        let patch: ClientePatch = serde_json::from_str(r#"{"foo":"bar"}"#).unwrap();
        assert!(patch.is_empty());
        let patch: ClientePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
