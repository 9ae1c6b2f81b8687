//! Modelo de Camión
//!
//! Mapea la tabla `camiones`. La descripción es única y el borrado se
//! rechaza mientras el camión tenga días asignados.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::dto::camion_dto::{CamionPatch, CamionPayload};
use crate::models::asignacion::AssignmentSide;
use crate::models::entity::{DeletePolicy, Entity, EntityId, EntityLabels};

/// Camión - mapea exactamente a la tabla camiones
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Camion {
    pub id: EntityId,
    pub descripcion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Camion {
    type Payload = CamionPayload;
    type Patch = CamionPatch;

    const TABLE: &'static str = "camiones";
    const COLUMNS: &'static str = "id, descripcion, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["descripcion"];
    const ORDER_BY: &'static str = "descripcion ASC, id ASC";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const USAGE_GUARD: Option<AssignmentSide> = Some(AssignmentSide::Camion);
    const LABELS: EntityLabels = EntityLabels {
        singular: "Camión",
        plural: "Camiones",
        not_found: "Camión no encontrado",
        invalid_id: "ID de camión inválido",
        invalid_payload: "Datos de camión inválidos",
        duplicate: "Ya existe un camión con esa descripción",
        in_use: "No se puede eliminar el camión porque está siendo usado",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
