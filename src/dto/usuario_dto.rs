use serde::Deserialize;

use crate::dto::normalize_text;
use crate::models::entity::{ChangeSet, FieldChange};
use crate::models::usuario::ROL_POR_DEFECTO;
use crate::validators::usuario::{validate_usuario, validate_usuario_patch};

/// Emails se guardan recortados y en minúsculas
pub(crate) fn normalize_email(value: &Option<String>) -> Option<String> {
    normalize_text(value).map(|email| email.to_lowercase())
}

/// Body de PUT /usuarios/:id. La contraseña se cambia sólo por
/// PUT /usuarios/:id/password.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioPayload {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

impl ChangeSet for UsuarioPayload {
    fn validation_errors(&self) -> Vec<String> {
        validate_usuario(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        let rol = normalize_text(&self.rol).unwrap_or_else(|| ROL_POR_DEFECTO.to_string());
        vec![
            FieldChange::text("email", normalize_email(&self.email)),
            FieldChange::text("nombre", normalize_text(&self.nombre)),
            FieldChange::text("apellido", normalize_text(&self.apellido)),
            FieldChange::text("rol", Some(rol)),
            FieldChange::boolean("activo", self.activo.unwrap_or(true)),
        ]
    }
}

/// Body de PATCH /usuarios/:id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioPatch {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

impl ChangeSet for UsuarioPatch {
    fn validation_errors(&self) -> Vec<String> {
        validate_usuario_patch(self)
    }

    fn changes(&self) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        if self.email.is_some() {
            changes.push(FieldChange::text("email", normalize_email(&self.email)));
        }
        let texts = [
            ("nombre", &self.nombre),
            ("apellido", &self.apellido),
            ("rol", &self.rol),
        ];
        for (column, value) in texts {
            if value.is_some() {
                changes.push(FieldChange::text(column, normalize_text(value)));
            }
        }
        if let Some(activo) = self.activo {
            changes.push(FieldChange::boolean("activo", activo));
        }
        changes
    }
}

/// Body de POST /usuarios
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrearUsuarioRequest {
    #[serde(flatten)]
    pub usuario: UsuarioPayload,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body de PUT /usuarios/:id/password
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CambiarPasswordRequest {
    #[serde(alias = "password_actual")]
    pub password_actual: Option<String>,
    #[serde(alias = "password_nueva")]
    pub password_nueva: Option<String>,
}
