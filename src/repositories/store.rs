//! Contratos de persistencia
//!
//! Los controladores dependen de estos traits y no de un backend concreto;
//! `pg` los implementa sobre PostgreSQL y `memory` sobre un mapa en proceso.

use std::time::Duration;

use async_trait::async_trait;

use crate::models::asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
use crate::models::cliente::{Cliente, Ubicacion};
use crate::models::entity::{Entity, EntityId, FieldChange, ListFilter, Page};
use crate::models::usuario::{Usuario, UsuarioStats};
use crate::utils::errors::AppResult;

/// CRUD genérico de una entidad
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    async fn list_page(&self, filter: &ListFilter) -> AppResult<Page<E>>;

    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<E>>;

    async fn create(&self, changes: &[FieldChange]) -> AppResult<E>;

    /// Reemplaza todas las columnas escribibles
    async fn update(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>>;

    /// Modifica sólo las columnas recibidas; una lista vacía es un error
    async fn patch(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>>;

    /// Borrado físico o lógico según `E::DELETE_POLICY`
    async fn delete(&self, id: EntityId) -> AppResult<Option<E>>;

    async fn count(&self) -> AppResult<i64>;
}

/// Consultas propias de clientes
#[async_trait]
pub trait ClienteStore: Send + Sync {
    async fn find_ubicacion(&self, id: EntityId) -> AppResult<Option<Ubicacion>>;

    async fn list_activos(&self) -> AppResult<Vec<Cliente>>;

    async fn list_con_ubicacion(&self) -> AppResult<Vec<Cliente>>;
}

/// Consultas de cuentas de usuario
#[async_trait]
pub trait UsuarioStore: Send + Sync {
    /// `email` ya normalizado a minúsculas
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Usuario>>;

    /// Marca `last_login` con la hora actual
    async fn record_login(&self, id: EntityId) -> AppResult<Option<Usuario>>;

    async fn stats(&self) -> AppResult<UsuarioStats>;
}

/// Relación camiones ↔ días de entrega
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn is_referenced(&self, side: AssignmentSide, id: EntityId) -> AppResult<bool>;

    /// Contrapartes del dueño `id`; `NotFound` si el dueño no existe
    async fn list_counterparts(
        &self,
        side: AssignmentSide,
        id: EntityId,
    ) -> AppResult<Vec<AssignedEntity>>;

    /// Reemplaza atómicamente todas las asignaciones del dueño `id`
    async fn replace(
        &self,
        side: AssignmentSide,
        id: EntityId,
        counterpart_ids: &[EntityId],
    ) -> AppResult<()>;

    async fn list_with_counterparts(
        &self,
        side: AssignmentSide,
    ) -> AppResult<Vec<EntityWithAssignments>>;
}

/// Sonda de salud del backend de persistencia
#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Ejecuta una consulta mínima y devuelve la latencia observada
    async fn ping(&self) -> AppResult<Duration>;
}

/// Quita ids repetidos conservando el orden de llegada
pub fn dedupe_ids(ids: &[EntityId]) -> Vec<EntityId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_ids() {
        assert_eq!(dedupe_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedupe_ids(&[]).is_empty());
    }
}
