//! Modelo de la relación camiones ↔ días de entrega (`camiones_dias`)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::camion::Camion;
use crate::models::dia_entrega::DiaEntrega;
use crate::models::entity::{Entity, EntityId, EntityLabels};

/// Fila de la tabla de unión
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asignacion {
    pub id: EntityId,
    pub camion_id: EntityId,
    pub dia_entrega_id: EntityId,
    pub created_at: DateTime<Utc>,
}

/// Contraparte asignada, tal como se devuelve en los listados
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct AssignedEntity {
    pub id: EntityId,
    pub descripcion: String,
}

/// Entidad con todas sus contrapartes (camión con días, día con camiones)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityWithAssignments {
    pub id: EntityId,
    pub descripcion: String,
    pub asignados: Vec<AssignedEntity>,
}

/// Lado dueño de una operación sobre `camiones_dias`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentSide {
    Camion,
    DiaEntrega,
}

impl AssignmentSide {
    pub const JOIN_TABLE: &'static str = "camiones_dias";

    pub fn table(self) -> &'static str {
        match self {
            AssignmentSide::Camion => Camion::TABLE,
            AssignmentSide::DiaEntrega => DiaEntrega::TABLE,
        }
    }

    /// Columna de `camiones_dias` que apunta a este lado
    pub fn foreign_key(self) -> &'static str {
        match self {
            AssignmentSide::Camion => "camion_id",
            AssignmentSide::DiaEntrega => "dia_entrega_id",
        }
    }

    pub fn counterpart(self) -> Self {
        match self {
            AssignmentSide::Camion => AssignmentSide::DiaEntrega,
            AssignmentSide::DiaEntrega => AssignmentSide::Camion,
        }
    }

    /// Clave de orden de visualización: camiones por descripción, días por id
    pub fn order_columns(self) -> &'static [&'static str] {
        match self {
            AssignmentSide::Camion => &["descripcion", "id"],
            AssignmentSide::DiaEntrega => &["id"],
        }
    }

    /// `ORDER BY` calificado con el alias de tabla dado
    pub fn order_by(self, alias: &str) -> String {
        self.order_columns()
            .iter()
            .map(|column| format!("{}.{} ASC", alias, column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn labels(self) -> &'static EntityLabels {
        match self {
            AssignmentSide::Camion => &Camion::LABELS,
            AssignmentSide::DiaEntrega => &DiaEntrega::LABELS,
        }
    }

    /// Par `(camion_id, dia_entrega_id)` para un dueño y una contraparte
    pub fn pair(self, owner_id: EntityId, counterpart_id: EntityId) -> (EntityId, EntityId) {
        match self {
            AssignmentSide::Camion => (owner_id, counterpart_id),
            AssignmentSide::DiaEntrega => (counterpart_id, owner_id),
        }
    }
}
