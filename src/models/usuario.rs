//! Modelo de Usuario
//!
//! Mapea la tabla `usuarios`. El hash de la contraseña nunca se serializa y
//! el borrado es lógico (`activo = false`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::dto::list_dto::ListQuery;
use crate::dto::usuario_dto::{UsuarioPatch, UsuarioPayload};
use crate::models::asignacion::AssignmentSide;
use crate::models::entity::{
    DeletePolicy, Entity, EntityId, EntityLabels, FieldValue, Predicate,
};

/// Roles aceptados por la columna `rol`
pub const ROLES: [&str; 3] = ["user", "admin", "super_admin"];
pub const ROL_POR_DEFECTO: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: EntityId,
    pub email: String,
    /// Hash bcrypt
    #[serde(skip_serializing)]
    pub password: String,
    pub nombre: String,
    pub apellido: String,
    pub rol: String,
    pub activo: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conteos de GET /usuarios/stats
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioStats {
    pub total: i64,
    pub activos: i64,
    pub inactivos: i64,
    pub por_rol: BTreeMap<String, i64>,
}

impl Entity for Usuario {
    type Payload = UsuarioPayload;
    type Patch = UsuarioPatch;

    const TABLE: &'static str = "usuarios";
    const COLUMNS: &'static str = "id, email, password, nombre, apellido, rol, activo, last_login, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["email", "nombre", "apellido"];
    const ORDER_BY: &'static str = "email ASC, id ASC";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft {
        flag_column: "activo",
    };
    const USAGE_GUARD: Option<AssignmentSide> = None;
    const LABELS: EntityLabels = EntityLabels {
        singular: "Usuario",
        plural: "Usuarios",
        not_found: "Usuario no encontrado",
        invalid_id: "ID de usuario inválido",
        invalid_payload: "Datos de usuario inválidos",
        duplicate: "El email ya está registrado",
        in_use: "No se puede eliminar el usuario porque está siendo usado",
    };

    fn id(&self) -> EntityId {
        self.id
    }

    fn list_predicates(query: &ListQuery) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(activo) = query.activo {
            predicates.push(Predicate {
                column: "activo",
                value: FieldValue::Bool(activo),
            });
        }
        if let Some(rol) = query.rol.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            predicates.push(Predicate {
                column: "rol",
                value: FieldValue::Text(Some(rol.to_string())),
            });
        }
        predicates
    }
}
