//! Modelo de Cliente
//!
//! Mapea la tabla `clientes`. Los clientes no participan en la relación
//! camiones ↔ días; su borrado es lógico (`activo = false`).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::dto::cliente_dto::{ClientePatch, ClientePayload};
use crate::dto::list_dto::ListQuery;
use crate::models::asignacion::AssignmentSide;
use crate::models::entity::{
    DeletePolicy, Entity, EntityId, EntityLabels, FieldValue, Predicate,
};

/// Cliente principal - mapea exactamente a la tabla clientes
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: EntityId,
    pub codigo_alternativo: Option<String>,
    pub nombre: String,
    pub razon: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub rut: Option<String>,
    pub activo: bool,
    /// Longitud
    pub x: Option<f64>,
    /// Latitud
    pub y: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ubicación de un cliente con coordenadas cargadas
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Ubicacion {
    pub id: EntityId,
    pub nombre: String,
    pub x: f64,
    pub y: f64,
}

impl Cliente {
    pub fn ubicacion(&self) -> Option<Ubicacion> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Ubicacion {
                id: self.id,
                nombre: self.nombre.clone(),
                x,
                y,
            }),
            _ => None,
        }
    }
}

impl Entity for Cliente {
    type Payload = ClientePayload;
    type Patch = ClientePatch;

    const TABLE: &'static str = "clientes";
    const COLUMNS: &'static str = "id, codigo_alternativo, nombre, razon, direccion, telefono, rut, activo, x, y, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["nombre", "razon", "direccion"];
    const ORDER_BY: &'static str = "nombre ASC, id ASC";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft {
        flag_column: "activo",
    };
    const USAGE_GUARD: Option<AssignmentSide> = None;
    const LABELS: EntityLabels = EntityLabels {
        singular: "Cliente",
        plural: "Clientes",
        not_found: "Cliente no encontrado",
        invalid_id: "ID de cliente inválido",
        invalid_payload: "Datos de cliente inválidos",
        duplicate: "Ya existe un cliente con ese código alternativo",
        in_use: "No se puede eliminar el cliente porque está siendo usado",
    };

    fn id(&self) -> EntityId {
        self.id
    }

    fn list_predicates(query: &ListQuery) -> Vec<Predicate> {
        query
            .activo
            .map(|activo| Predicate {
                column: "activo",
                value: FieldValue::Bool(activo),
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cliente(x: Option<f64>, y: Option<f64>) -> Cliente {
        let now = Utc::now();
        Cliente {
            id: 1,
            codigo_alternativo: None,
            nombre: "Empresa ABC".into(),
            razon: None,
            direccion: None,
            telefono: None,
            rut: None,
            activo: true,
            x,
            y,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ubicacion_requiere_ambas_coordenadas() {
        assert!(cliente(Some(-70.6), None).ubicacion().is_none());
        let ubicacion = cliente(Some(-70.6), Some(-33.4)).ubicacion().unwrap();
        assert_eq!(ubicacion.x, -70.6);
        assert_eq!(ubicacion.nombre, "Empresa ABC");
    }

    #[test]
    fn test_filtro_activo() {
        let query = ListQuery {
            activo: Some(false),
            ..ListQuery::default()
        };
        let predicates = Cliente::list_predicates(&query);
        assert_eq!(
            predicates,
            vec![Predicate {
                column: "activo",
                value: FieldValue::Bool(false)
            }]
        );
        assert!(Cliente::list_predicates(&ListQuery::default()).is_empty());
    }
}
