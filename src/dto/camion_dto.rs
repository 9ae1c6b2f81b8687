use serde::Deserialize;

use crate::dto::{double_option, normalize_text};
use crate::models::entity::{ChangeSet, FieldChange};
use crate::validators::camion::{validate_camion, validate_camion_patch};

/// Request para crear o reemplazar un camión
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CamionPayload {
    pub descripcion: Option<String>,
}

impl ChangeSet for CamionPayload {
    fn validation_errors(&self) -> Vec<String> {
        validate_camion(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        vec![FieldChange::text("descripcion", normalize_text(&self.descripcion))]
    }
}

/// Request para actualizar parcialmente un camión
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CamionPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,
}

impl ChangeSet for CamionPatch {
    fn validation_errors(&self) -> Vec<String> {
        validate_camion_patch(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        self.descripcion
            .as_ref()
            .map(|value| FieldChange::text("descripcion", normalize_text(value)))
            .into_iter()
            .collect()
    }
}
