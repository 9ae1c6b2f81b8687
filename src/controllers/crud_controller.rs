//! Controlador CRUD genérico
//!
//! Una instancia por entidad. Recibe el repositorio y el repositorio de
//! asignaciones por composición; las reglas de cada entidad salen de su
//! implementación de `Entity` y de sus payloads.

use std::sync::Arc;

use tracing::info;

use crate::dto::api_response::{ApiResponse, PaginationMeta};
use crate::dto::list_dto::ListQuery;
use crate::models::entity::{ChangeSet, Entity, EntityId};
use crate::repositories::store::{AssignmentStore, EntityStore};
use crate::utils::errors::{AppError, AppResult};

pub struct CrudController<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
    assignments: Arc<dyn AssignmentStore>,
}

impl<E: Entity> CrudController<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>, assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { store, assignments }
    }

    fn not_found() -> AppError {
        AppError::NotFound(E::LABELS.not_found.to_string())
    }

    fn check<P: ChangeSet>(payload: &P) -> AppResult<()> {
        let errors = payload.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(E::LABELS.invalid_payload, errors))
        }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<ApiResponse<Vec<E>>> {
        let filter = query.to_filter::<E>();
        let page = self.store.list_page(&filter).await?;
        let pagination = PaginationMeta::new(filter.page, filter.limit, page.total);

        Ok(ApiResponse::paginated(
            page.items,
            pagination,
            format!("{} obtenidos exitosamente", E::LABELS.plural),
        ))
    }

    pub async fn get_by_id(&self, id: EntityId) -> AppResult<ApiResponse<E>> {
        let entity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(Self::not_found)?;

        Ok(ApiResponse::success(
            entity,
            format!("{} obtenido exitosamente", E::LABELS.singular),
        ))
    }

    pub async fn create(&self, payload: E::Payload) -> AppResult<ApiResponse<E>> {
        Self::check(&payload)?;
        let entity = self.store.create(&payload.changes()).await?;
        info!("✅ {} creado: id={}", E::LABELS.singular, entity.id());

        Ok(ApiResponse::created(
            entity,
            format!("{} creado exitosamente", E::LABELS.singular),
        ))
    }

    pub async fn update(&self, id: EntityId, payload: E::Payload) -> AppResult<ApiResponse<E>> {
        Self::check(&payload)?;
        let entity = self
            .store
            .update(id, &payload.changes())
            .await?
            .ok_or_else(Self::not_found)?;
        info!("✏️ {} actualizado: id={}", E::LABELS.singular, id);

        Ok(ApiResponse::success(
            entity,
            format!("{} actualizado exitosamente", E::LABELS.singular),
        ))
    }

    pub async fn patch(&self, id: EntityId, patch: E::Patch) -> AppResult<ApiResponse<E>> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "No se proporcionaron datos para actualizar".to_string(),
            ));
        }
        Self::check(&patch)?;
        let entity = self
            .store
            .patch(id, &patch.changes())
            .await?
            .ok_or_else(Self::not_found)?;
        info!("✏️ {} actualizado parcialmente: id={}", E::LABELS.singular, id);

        Ok(ApiResponse::success(
            entity,
            format!("{} actualizado exitosamente", E::LABELS.singular),
        ))
    }

    pub async fn delete(&self, id: EntityId) -> AppResult<ApiResponse<E>> {
        if let Some(side) = E::USAGE_GUARD {
            if self.assignments.is_referenced(side, id).await? {
                return Err(AppError::in_use(E::LABELS.in_use));
            }
        }

        let entity = self
            .store
            .delete(id)
            .await?
            .ok_or_else(Self::not_found)?;
        info!("🗑️ {} eliminado: id={}", E::LABELS.singular, id);

        Ok(ApiResponse::success(
            entity,
            format!("{} eliminado exitosamente", E::LABELS.singular),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::camion_dto::{CamionPatch, CamionPayload};
    use crate::models::asignacion::AssignmentSide;
    use crate::models::camion::Camion;
    use crate::models::dia_entrega::DiaEntrega;
    use crate::models::entity::FieldChange;
    use crate::repositories::memory_repository::MemoryStore;
    use crate::utils::errors::ConflictKind;

    fn controller() -> (Arc<MemoryStore>, CrudController<Camion>) {
        let store = Arc::new(MemoryStore::new());
        let controller = CrudController::new(store.clone(), store.clone());
        (store, controller)
    }

    fn payload(descripcion: &str) -> CamionPayload {
        CamionPayload {
            descripcion: Some(descripcion.to_string()),
        }
    }

    #[tokio::test]
    async fn test_crear_y_obtener() {
        let (_, controller) = controller();
        let created = controller.create(payload("Truck A")).await.unwrap();
        let fetched = controller.get_by_id(created.data.id).await.unwrap();
        assert_eq!(fetched.data, created.data);
        assert_eq!(fetched.data.descripcion, "Truck A");
    }

    #[tokio::test]
    async fn test_validacion_no_crea_filas() {
        let (store, controller) = controller();
        let err = controller.create(CamionPayload::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed { .. }));
        assert_eq!(EntityStore::<Camion>::count(store.as_ref()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_patch_vacio_no_modifica() {
        let (_, controller) = controller();
        let created = controller.create(payload("Truck A")).await.unwrap();
        let err = controller
            .patch(created.data.id, CamionPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let fetched = controller.get_by_id(created.data.id).await.unwrap();
        assert_eq!(fetched.data.updated_at, created.data.updated_at);
    }

    #[tokio::test]
    async fn test_borrado_protegido() {
        let (store, controller) = controller();
        let camion = controller.create(payload("Truck A")).await.unwrap().data;
        let dia: DiaEntrega = store
            .create(&[FieldChange::text("descripcion", Some("Monday".into()))])
            .await
            .unwrap();
        store
            .replace(AssignmentSide::Camion, camion.id, &[dia.id])
            .await
            .unwrap();

        let err = controller.delete(camion.id).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict {
                kind: ConflictKind::InUse,
                ..
            }
        ));

        store
            .replace(AssignmentSide::Camion, camion.id, &[])
            .await
            .unwrap();
        controller.delete(camion.id).await.unwrap();
        assert!(matches!(
            controller.get_by_id(camion.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
