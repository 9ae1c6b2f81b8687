use serde::Deserialize;

use crate::dto::{double_option, normalize_text};
use crate::models::entity::{ChangeSet, FieldChange};
use crate::validators::dia_entrega::{validate_dia_entrega, validate_dia_entrega_patch};

/// Request para crear o reemplazar un día de entrega
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiaEntregaPayload {
    pub descripcion: Option<String>,
}

impl ChangeSet for DiaEntregaPayload {
    fn validation_errors(&self) -> Vec<String> {
        validate_dia_entrega(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        vec![FieldChange::text("descripcion", normalize_text(&self.descripcion))]
    }
}

/// Request para actualizar parcialmente un día de entrega
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiaEntregaPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,
}

impl ChangeSet for DiaEntregaPatch {
    fn validation_errors(&self) -> Vec<String> {
        validate_dia_entrega_patch(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        self.descripcion
            .as_ref()
            .map(|value| FieldChange::text("descripcion", normalize_text(value)))
            .into_iter()
            .collect()
    }
}
