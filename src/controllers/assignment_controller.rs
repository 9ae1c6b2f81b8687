//! Asignaciones camiones ↔ días de entrega, vistas desde cualquiera de
//! los dos lados

use std::sync::Arc;

use tracing::info;

use crate::dto::api_response::ApiResponse;
use crate::models::asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
use crate::models::entity::EntityId;
use crate::repositories::store::AssignmentStore;
use crate::utils::errors::AppResult;

pub struct AssignmentController {
    store: Arc<dyn AssignmentStore>,
}

impl AssignmentController {
    pub fn new(store: Arc<dyn AssignmentStore>) -> Self {
        Self { store }
    }

    fn list_message(side: AssignmentSide) -> &'static str {
        match side {
            AssignmentSide::Camion => "Días del camión obtenidos exitosamente",
            AssignmentSide::DiaEntrega => "Camiones del día de entrega obtenidos exitosamente",
        }
    }

    pub async fn list(
        &self,
        side: AssignmentSide,
        id: EntityId,
    ) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
        let counterparts = self.store.list_counterparts(side, id).await?;
        Ok(ApiResponse::success(counterparts, Self::list_message(side)))
    }

    /// Reemplaza las asignaciones y devuelve la lista resultante
    pub async fn replace(
        &self,
        side: AssignmentSide,
        id: EntityId,
        counterpart_ids: Vec<EntityId>,
    ) -> AppResult<ApiResponse<Vec<AssignedEntity>>> {
        self.store.replace(side, id, &counterpart_ids).await?;
        let counterparts = self.store.list_counterparts(side, id).await?;
        info!(
            "🔗 {} {}: {} asignaciones",
            side.labels().singular,
            id,
            counterparts.len()
        );

        let message = match side {
            AssignmentSide::Camion => "Días asignados al camión exitosamente",
            AssignmentSide::DiaEntrega => "Camiones asignados al día de entrega exitosamente",
        };
        Ok(ApiResponse::success(counterparts, message))
    }

    pub async fn list_all(
        &self,
        side: AssignmentSide,
    ) -> AppResult<ApiResponse<Vec<EntityWithAssignments>>> {
        let owners = self.store.list_with_counterparts(side).await?;
        let message = match side {
            AssignmentSide::Camion => "Camiones con días obtenidos exitosamente",
            AssignmentSide::DiaEntrega => "Días de entrega con camiones obtenidos exitosamente",
        };
        Ok(ApiResponse::success(owners, message))
    }
}
