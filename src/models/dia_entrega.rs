//! Modelo de Día de entrega (tabla `dias_entrega`)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::dto::dia_entrega_dto::{DiaEntregaPatch, DiaEntregaPayload};
use crate::models::asignacion::AssignmentSide;
use crate::models::entity::{DeletePolicy, Entity, EntityId, EntityLabels};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiaEntrega {
    pub id: EntityId,
    pub descripcion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for DiaEntrega {
    type Payload = DiaEntregaPayload;
    type Patch = DiaEntregaPatch;

    const TABLE: &'static str = "dias_entrega";
    const COLUMNS: &'static str = "id, descripcion, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["descripcion"];
    // Los días se muestran en el orden de la semana en que fueron cargados
    const ORDER_BY: &'static str = "id ASC";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;
    const USAGE_GUARD: Option<AssignmentSide> = Some(AssignmentSide::DiaEntrega);
    const LABELS: EntityLabels = EntityLabels {
        singular: "Día de entrega",
        plural: "Días de entrega",
        not_found: "Día de entrega no encontrado",
        invalid_id: "ID de día de entrega inválido",
        invalid_payload: "Datos de día de entrega inválidos",
        duplicate: "Ya existe un día de entrega con esa descripción",
        in_use: "No se puede eliminar el día de entrega porque está siendo usado en asignaciones de camiones",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
