//! Consultas de clientes que no forman parte del CRUD genérico

use std::sync::Arc;

use crate::dto::api_response::ApiResponse;
use crate::models::cliente::{Cliente, Ubicacion};
use crate::models::entity::EntityId;
use crate::repositories::store::ClienteStore;
use crate::utils::errors::{AppError, AppResult};

pub struct ClienteController {
    store: Arc<dyn ClienteStore>,
}

impl ClienteController {
    pub fn new(store: Arc<dyn ClienteStore>) -> Self {
        Self { store }
    }

    /// Ubicación `{id, nombre, x, y}`; 404 si el cliente no existe o no
    /// tiene ambas coordenadas
    pub async fn ubicacion(&self, id: EntityId) -> AppResult<ApiResponse<Ubicacion>> {
        let ubicacion = self
            .store
            .find_ubicacion(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado o sin ubicación".to_string()))?;

        Ok(ApiResponse::success(
            ubicacion,
            "Ubicación del cliente obtenida exitosamente",
        ))
    }

    pub async fn activos(&self) -> AppResult<ApiResponse<Vec<Cliente>>> {
        let clientes = self.store.list_activos().await?;
        Ok(ApiResponse::success(
            clientes,
            "Clientes activos obtenidos exitosamente",
        ))
    }

    pub async fn con_ubicacion(&self) -> AppResult<ApiResponse<Vec<Cliente>>> {
        let clientes = self.store.list_con_ubicacion().await?;
        Ok(ApiResponse::success(
            clientes,
            "Clientes con ubicación obtenidos exitosamente",
        ))
    }
}
