//! Backend en memoria
//!
//! Implementa los mismos contratos que PostgreSQL sobre mapas en proceso.
//! Lo usan los tests de la API y `STORAGE_BACKEND=memory` para correr el
//! servidor sin base de datos. Reproduce las restricciones del esquema:
//! unicidad, claves foráneas RESTRICT e ids que nunca se reutilizan.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::asignacion::{
    AssignedEntity, Asignacion, AssignmentSide, EntityWithAssignments,
};
use crate::models::camion::Camion;
use crate::models::cliente::{Cliente, Ubicacion};
use crate::models::dia_entrega::DiaEntrega;
use crate::models::entity::{
    DeletePolicy, Entity, EntityId, FieldChange, FieldValue, ListFilter, Page,
};
use crate::models::usuario::{Usuario, UsuarioStats, ROL_POR_DEFECTO};
use crate::repositories::store::{
    dedupe_ids, AssignmentStore, ClienteStore, EntityStore, StoreHealth, UsuarioStore,
};
use crate::utils::errors::{AppError, AppResult};

const FAILPOINT_DISABLED: usize = usize::MAX;

/// Filas de una tabla y su secuencia
#[derive(Debug)]
pub struct MemoryTable<E> {
    rows: BTreeMap<EntityId, E>,
    next_id: EntityId,
}

impl<E> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Debug)]
pub struct MemoryTables {
    clientes: MemoryTable<Cliente>,
    camiones: MemoryTable<Camion>,
    dias_entrega: MemoryTable<DiaEntrega>,
    usuarios: MemoryTable<Usuario>,
    asignaciones: Vec<Asignacion>,
    next_asignacion_id: EntityId,
}

impl Default for MemoryTables {
    fn default() -> Self {
        Self {
            clientes: MemoryTable::default(),
            camiones: MemoryTable::default(),
            dias_entrega: MemoryTable::default(),
            usuarios: MemoryTable::default(),
            asignaciones: Vec::new(),
            next_asignacion_id: 1,
        }
    }
}

impl MemoryTables {
    fn descripcion(&self, side: AssignmentSide, id: EntityId) -> Option<&str> {
        match side {
            AssignmentSide::Camion => self.camiones.rows.get(&id).map(|c| c.descripcion.as_str()),
            AssignmentSide::DiaEntrega => self
                .dias_entrega
                .rows
                .get(&id)
                .map(|d| d.descripcion.as_str()),
        }
    }

    fn all(&self, side: AssignmentSide) -> Vec<AssignedEntity> {
        let mut items: Vec<AssignedEntity> = match side {
            AssignmentSide::Camion => self
                .camiones
                .rows
                .values()
                .map(|c| AssignedEntity {
                    id: c.id,
                    descripcion: c.descripcion.clone(),
                })
                .collect(),
            AssignmentSide::DiaEntrega => self
                .dias_entrega
                .rows
                .values()
                .map(|d| AssignedEntity {
                    id: d.id,
                    descripcion: d.descripcion.clone(),
                })
                .collect(),
        };
        sort_side(side, &mut items);
        items
    }

    fn is_referenced(&self, side: AssignmentSide, id: EntityId) -> bool {
        self.asignaciones
            .iter()
            .any(|a| owner_of(side, a) == id)
    }

    fn counterparts(&self, side: AssignmentSide, id: EntityId) -> Vec<AssignedEntity> {
        let counterpart = side.counterpart();
        let mut items: Vec<AssignedEntity> = self
            .asignaciones
            .iter()
            .filter(|a| owner_of(side, a) == id)
            .filter_map(|a| {
                let counterpart_id = owner_of(counterpart, a);
                self.descripcion(counterpart, counterpart_id)
                    .map(|descripcion| AssignedEntity {
                        id: counterpart_id,
                        descripcion: descripcion.to_string(),
                    })
            })
            .collect();
        sort_side(counterpart, &mut items);
        items
    }
}

fn owner_of(side: AssignmentSide, asignacion: &Asignacion) -> EntityId {
    match side {
        AssignmentSide::Camion => asignacion.camion_id,
        AssignmentSide::DiaEntrega => asignacion.dia_entrega_id,
    }
}

/// Mismo orden que `AssignmentSide::order_columns`
fn sort_side(side: AssignmentSide, items: &mut [AssignedEntity]) {
    match side {
        AssignmentSide::Camion => {
            items.sort_by(|a, b| collate(&a.descripcion, &b.descripcion).then(a.id.cmp(&b.id)))
        }
        AssignmentSide::DiaEntrega => items.sort_by_key(|item| item.id),
    }
}

fn unknown_column<E: Entity>(column: &str) -> AppError {
    AppError::Internal(format!("Columna desconocida en {}: {}", E::TABLE, column))
}

fn text_value<E: Entity>(change: &FieldChange) -> AppResult<Option<String>> {
    match &change.value {
        FieldValue::Text(value) => Ok(value.clone()),
        _ => Err(unknown_column::<E>(change.column)),
    }
}

fn required_text<E: Entity>(change: &FieldChange) -> AppResult<String> {
    text_value::<E>(change)?.ok_or_else(|| {
        AppError::Internal(format!("{}.{} no admite NULL", E::TABLE, change.column))
    })
}

/// Acceso por nombre de columna a una entidad guardada en memoria
pub trait MemoryEntity: Entity {
    fn blank(id: EntityId, now: DateTime<Utc>) -> Self;

    fn set(&mut self, change: &FieldChange) -> AppResult<()>;

    fn touch(&mut self, now: DateTime<Utc>);

    fn column(&self, column: &str) -> Option<FieldValue>;

    /// Clave de orden principal; `None` ordena sólo por id
    fn sort_key(&self) -> Option<&str>;

    /// Valor de la columna UNIQUE, si la hay
    fn unique_key(&self) -> Option<&str>;

    fn deactivate(&mut self, flag_column: &str) -> AppResult<()>;

    fn table(tables: &MemoryTables) -> &MemoryTable<Self>;

    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self>;
}

impl MemoryEntity for Cliente {
    fn blank(id: EntityId, now: DateTime<Utc>) -> Self {
        Cliente {
            id,
            codigo_alternativo: None,
            nombre: String::new(),
            razon: None,
            direccion: None,
            telefono: None,
            rut: None,
            activo: true,
            x: None,
            y: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn set(&mut self, change: &FieldChange) -> AppResult<()> {
        match (change.column, &change.value) {
            ("codigo_alternativo", _) => self.codigo_alternativo = text_value::<Self>(change)?,
            ("nombre", _) => self.nombre = required_text::<Self>(change)?,
            ("razon", _) => self.razon = text_value::<Self>(change)?,
            ("direccion", _) => self.direccion = text_value::<Self>(change)?,
            ("telefono", _) => self.telefono = text_value::<Self>(change)?,
            ("rut", _) => self.rut = text_value::<Self>(change)?,
            ("activo", FieldValue::Bool(activo)) => self.activo = *activo,
            ("x", FieldValue::Float(x)) => self.x = *x,
            ("y", FieldValue::Float(y)) => self.y = *y,
            (column, _) => return Err(unknown_column::<Self>(column)),
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn column(&self, column: &str) -> Option<FieldValue> {
        match column {
            "codigo_alternativo" => Some(FieldValue::Text(self.codigo_alternativo.clone())),
            "nombre" => Some(FieldValue::Text(Some(self.nombre.clone()))),
            "razon" => Some(FieldValue::Text(self.razon.clone())),
            "direccion" => Some(FieldValue::Text(self.direccion.clone())),
            "telefono" => Some(FieldValue::Text(self.telefono.clone())),
            "rut" => Some(FieldValue::Text(self.rut.clone())),
            "activo" => Some(FieldValue::Bool(self.activo)),
            "x" => Some(FieldValue::Float(self.x)),
            "y" => Some(FieldValue::Float(self.y)),
            _ => None,
        }
    }

    fn sort_key(&self) -> Option<&str> {
        Some(&self.nombre)
    }

    fn unique_key(&self) -> Option<&str> {
        self.codigo_alternativo.as_deref()
    }

    fn deactivate(&mut self, flag_column: &str) -> AppResult<()> {
        match flag_column {
            "activo" => {
                self.activo = false;
                Ok(())
            }
            column => Err(unknown_column::<Self>(column)),
        }
    }

    fn table(tables: &MemoryTables) -> &MemoryTable<Self> {
        &tables.clientes
    }

    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self> {
        &mut tables.clientes
    }
}

impl MemoryEntity for Usuario {
    fn blank(id: EntityId, now: DateTime<Utc>) -> Self {
        Usuario {
            id,
            email: String::new(),
            password: String::new(),
            nombre: String::new(),
            apellido: String::new(),
            rol: ROL_POR_DEFECTO.to_string(),
            activo: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn set(&mut self, change: &FieldChange) -> AppResult<()> {
        match (change.column, &change.value) {
            ("email", _) => self.email = required_text::<Self>(change)?,
            ("password", _) => self.password = required_text::<Self>(change)?,
            ("nombre", _) => self.nombre = required_text::<Self>(change)?,
            ("apellido", _) => self.apellido = required_text::<Self>(change)?,
            ("rol", _) => self.rol = required_text::<Self>(change)?,
            ("activo", FieldValue::Bool(activo)) => self.activo = *activo,
            (column, _) => return Err(unknown_column::<Self>(column)),
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn column(&self, column: &str) -> Option<FieldValue> {
        match column {
            "email" => Some(FieldValue::Text(Some(self.email.clone()))),
            "nombre" => Some(FieldValue::Text(Some(self.nombre.clone()))),
            "apellido" => Some(FieldValue::Text(Some(self.apellido.clone()))),
            "rol" => Some(FieldValue::Text(Some(self.rol.clone()))),
            "activo" => Some(FieldValue::Bool(self.activo)),
            _ => None,
        }
    }

    fn sort_key(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn deactivate(&mut self, flag_column: &str) -> AppResult<()> {
        match flag_column {
            "activo" => {
                self.activo = false;
                Ok(())
            }
            column => Err(unknown_column::<Self>(column)),
        }
    }

    fn table(tables: &MemoryTables) -> &MemoryTable<Self> {
        &tables.usuarios
    }

    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self> {
        &mut tables.usuarios
    }
}

/// Camiones y días comparten forma: sólo `descripcion`
macro_rules! impl_descripcion_entity {
    ($entity:ty, $field:ident, $sorted:expr) => {
        impl MemoryEntity for $entity {
            fn blank(id: EntityId, now: DateTime<Utc>) -> Self {
                Self {
                    id,
                    descripcion: String::new(),
                    created_at: now,
                    updated_at: now,
                }
            }

            fn set(&mut self, change: &FieldChange) -> AppResult<()> {
                match change.column {
                    "descripcion" => self.descripcion = required_text::<Self>(change)?,
                    column => return Err(unknown_column::<Self>(column)),
                }
                Ok(())
            }

            fn touch(&mut self, now: DateTime<Utc>) {
                self.updated_at = now;
            }

            fn column(&self, column: &str) -> Option<FieldValue> {
                match column {
                    "descripcion" => Some(FieldValue::Text(Some(self.descripcion.clone()))),
                    _ => None,
                }
            }

            fn sort_key(&self) -> Option<&str> {
                $sorted.then_some(self.descripcion.as_str())
            }

            fn unique_key(&self) -> Option<&str> {
                Some(&self.descripcion)
            }

            fn deactivate(&mut self, flag_column: &str) -> AppResult<()> {
                Err(unknown_column::<Self>(flag_column))
            }

            fn table(tables: &MemoryTables) -> &MemoryTable<Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self> {
                &mut tables.$field
            }
        }
    };
}

impl_descripcion_entity!(Camion, camiones, true);
impl_descripcion_entity!(DiaEntrega, dias_entrega, false);

fn matches_filter<E: MemoryEntity>(entity: &E, filter: &ListFilter) -> bool {
    let predicates_ok = filter
        .predicates
        .iter()
        .all(|p| entity.column(p.column).as_ref() == Some(&p.value));
    if !predicates_ok {
        return false;
    }

    match &filter.search {
        None => true,
        Some(search) => {
            let needle = search.to_lowercase();
            E::SEARCH_COLUMNS.iter().any(|column| match entity.column(column) {
                Some(FieldValue::Text(Some(text))) => text.to_lowercase().contains(&needle),
                _ => false,
            })
        }
    }
}

/// Orden de texto sin distinguir mayúsculas, como la collation de la base
fn collate(a: &str, b: &str) -> CmpOrdering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn display_order<E: MemoryEntity>(a: &E, b: &E) -> CmpOrdering {
    let by_key = match (a.sort_key(), b.sort_key()) {
        (Some(a), Some(b)) => collate(a, b),
        (a, b) => a.cmp(&b),
    };
    by_key.then(a.id().cmp(&b.id()))
}

fn check_unique<E: MemoryEntity>(table: &MemoryTable<E>, candidate: &E) -> AppResult<()> {
    if let Some(key) = candidate.unique_key() {
        let taken = table
            .rows
            .values()
            .any(|row| row.id() != candidate.id() && row.unique_key() == Some(key));
        if taken {
            return Err(AppError::duplicate(E::LABELS.duplicate));
        }
    }
    Ok(())
}

pub struct MemoryStore {
    tables: RwLock<MemoryTables>,
    fail_replace_after: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(MemoryTables::default()),
            fail_replace_after: AtomicUsize::new(FAILPOINT_DISABLED),
        }
    }

    /// Hace fallar el próximo `replace` después de insertar `inserted` filas,
    /// como lo haría un error de la base a mitad de la transacción
    pub fn fail_next_replace_after(&self, inserted: usize) {
        self.fail_replace_after.store(inserted, Ordering::SeqCst);
    }

    async fn apply_changes<E: MemoryEntity>(
        &self,
        id: EntityId,
        changes: &[FieldChange],
    ) -> AppResult<Option<E>> {
        let mut tables = self.tables.write().await;
        let table = E::table_mut(&mut tables);
        let Some(mut updated) = table.rows.get(&id).cloned() else {
            return Ok(None);
        };
        for change in changes {
            updated.set(change)?;
        }
        check_unique(table, &updated)?;
        updated.touch(Utc::now());
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }
}

#[async_trait]
impl<E: MemoryEntity> EntityStore<E> for MemoryStore {
    async fn list_page(&self, filter: &ListFilter) -> AppResult<Page<E>> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&E> = E::table(&tables)
            .rows
            .values()
            .filter(|row| matches_filter(*row, filter))
            .collect();
        matching.sort_by(|a, b| display_order(*a, *b));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(filter.offset().max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<E>> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).rows.get(&id).cloned())
    }

    async fn create(&self, changes: &[FieldChange]) -> AppResult<E> {
        let mut tables = self.tables.write().await;
        let table = E::table_mut(&mut tables);

        let mut entity = E::blank(table.next_id, Utc::now());
        for change in changes {
            entity.set(change)?;
        }
        check_unique(table, &entity)?;

        table.next_id += 1;
        table.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>> {
        self.apply_changes(id, changes).await
    }

    async fn patch(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>> {
        if changes.is_empty() {
            return Err(AppError::InvalidArgument(
                "No se proporcionaron datos para actualizar".to_string(),
            ));
        }
        self.apply_changes(id, changes).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<Option<E>> {
        let mut tables = self.tables.write().await;

        match E::DELETE_POLICY {
            DeletePolicy::Hard => {
                if let Some(side) = E::USAGE_GUARD {
                    // Equivalente a ON DELETE RESTRICT
                    if tables.is_referenced(side, id) {
                        return Err(AppError::referential(E::LABELS.in_use));
                    }
                }
                Ok(E::table_mut(&mut tables).rows.remove(&id))
            }
            DeletePolicy::Soft { flag_column } => {
                let Some(row) = E::table_mut(&mut tables).rows.get_mut(&id) else {
                    return Ok(None);
                };
                row.deactivate(flag_column)?;
                row.touch(Utc::now());
                Ok(Some(row.clone()))
            }
        }
    }

    async fn count(&self) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(E::table(&tables).rows.len() as i64)
    }
}

#[async_trait]
impl ClienteStore for MemoryStore {
    async fn find_ubicacion(&self, id: EntityId) -> AppResult<Option<Ubicacion>> {
        let tables = self.tables.read().await;
        Ok(tables.clientes.rows.get(&id).and_then(Cliente::ubicacion))
    }

    async fn list_activos(&self) -> AppResult<Vec<Cliente>> {
        let tables = self.tables.read().await;
        let mut clientes: Vec<Cliente> = tables
            .clientes
            .rows
            .values()
            .filter(|c| c.activo)
            .cloned()
            .collect();
        clientes.sort_by(display_order);
        Ok(clientes)
    }

    async fn list_con_ubicacion(&self) -> AppResult<Vec<Cliente>> {
        let tables = self.tables.read().await;
        let mut clientes: Vec<Cliente> = tables
            .clientes
            .rows
            .values()
            .filter(|c| c.x.is_some() && c.y.is_some())
            .cloned()
            .collect();
        clientes.sort_by(display_order);
        Ok(clientes)
    }
}

#[async_trait]
impl UsuarioStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let tables = self.tables.read().await;
        Ok(tables
            .usuarios
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn record_login(&self, id: EntityId) -> AppResult<Option<Usuario>> {
        let mut tables = self.tables.write().await;
        let Some(usuario) = tables.usuarios.rows.get_mut(&id) else {
            return Ok(None);
        };
        usuario.last_login = Some(Utc::now());
        Ok(Some(usuario.clone()))
    }

    async fn stats(&self) -> AppResult<UsuarioStats> {
        let tables = self.tables.read().await;
        let mut stats = UsuarioStats::default();
        for usuario in tables.usuarios.rows.values() {
            stats.total += 1;
            if usuario.activo {
                stats.activos += 1;
            } else {
                stats.inactivos += 1;
            }
            *stats.por_rol.entry(usuario.rol.clone()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn is_referenced(&self, side: AssignmentSide, id: EntityId) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.is_referenced(side, id))
    }

    async fn list_counterparts(
        &self,
        side: AssignmentSide,
        id: EntityId,
    ) -> AppResult<Vec<AssignedEntity>> {
        let tables = self.tables.read().await;
        if tables.descripcion(side, id).is_none() {
            return Err(AppError::NotFound(side.labels().not_found.to_string()));
        }
        Ok(tables.counterparts(side, id))
    }

    async fn replace(
        &self,
        side: AssignmentSide,
        id: EntityId,
        counterpart_ids: &[EntityId],
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let counterpart = side.counterpart();
        let ids = dedupe_ids(counterpart_ids);

        if tables.descripcion(side, id).is_none() {
            return Err(AppError::NotFound(side.labels().not_found.to_string()));
        }
        let missing: Vec<String> = ids
            .iter()
            .filter(|cid| tables.descripcion(counterpart, **cid).is_none())
            .map(|cid| cid.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "{} inexistentes: {}",
                counterpart.labels().plural,
                missing.join(", ")
            )));
        }

        // Se trabaja sobre una copia que sólo se publica si todo sale bien
        let mut staged: Vec<Asignacion> = tables
            .asignaciones
            .iter()
            .filter(|a| owner_of(side, a) != id)
            .cloned()
            .collect();
        let mut next_id = tables.next_asignacion_id;
        let fail_after = self.fail_replace_after.swap(FAILPOINT_DISABLED, Ordering::SeqCst);

        for (inserted, counterpart_id) in ids.iter().enumerate() {
            if inserted == fail_after {
                return Err(AppError::Internal(
                    "Fallo simulado durante el reemplazo de asignaciones".to_string(),
                ));
            }
            let (camion_id, dia_entrega_id) = side.pair(id, *counterpart_id);
            staged.push(Asignacion {
                id: next_id,
                camion_id,
                dia_entrega_id,
                created_at: Utc::now(),
            });
            next_id += 1;
        }

        tables.asignaciones = staged;
        tables.next_asignacion_id = next_id;
        Ok(())
    }

    async fn list_with_counterparts(
        &self,
        side: AssignmentSide,
    ) -> AppResult<Vec<EntityWithAssignments>> {
        let tables = self.tables.read().await;
        Ok(tables
            .all(side)
            .into_iter()
            .map(|owner| EntityWithAssignments {
                asignados: tables.counterparts(side, owner.id),
                id: owner.id,
                descripcion: owner.descripcion,
            })
            .collect())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<Duration> {
        Ok(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::ConflictKind;

    fn descripcion(value: &str) -> Vec<FieldChange> {
        vec![FieldChange::text("descripcion", Some(value.to_string()))]
    }

    async fn seed(store: &MemoryStore) -> (Camion, Vec<DiaEntrega>) {
        let camion: Camion = store.create(&descripcion("Truck A")).await.unwrap();
        let mut dias = Vec::new();
        for dia in ["Lunes", "Martes", "Miércoles"] {
            dias.push(EntityStore::<DiaEntrega>::create(store, &descripcion(dia)).await.unwrap());
        }
        (camion, dias)
    }

    #[tokio::test]
    async fn test_ids_no_se_reutilizan() {
        let store = MemoryStore::new();
        let first: Camion = store.create(&descripcion("A")).await.unwrap();
        EntityStore::<Camion>::delete(&store, first.id).await.unwrap();
        let second: Camion = store.create(&descripcion("B")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_descripcion_duplicada() {
        let store = MemoryStore::new();
        let _: Camion = store.create(&descripcion("A")).await.unwrap();
        let err = EntityStore::<Camion>::create(&store, &descripcion("A"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Conflict {
                kind: ConflictKind::Duplicate,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_listado_busca_y_pagina() {
        let store = MemoryStore::new();
        for nombre in ["Delta", "alfa", "Beta", "Alfalfa"] {
            let _: Camion = store.create(&descripcion(nombre)).await.unwrap();
        }

        let filter = ListFilter::new(1, 1, Some("ALFA".into()), Vec::new());
        let page: Page<Camion> = store.list_page(&filter).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].descripcion, "alfa");

        let filter = ListFilter::new(2, 1, Some("alfa".into()), Vec::new());
        let page: Page<Camion> = store.list_page(&filter).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].descripcion, "Alfalfa");
    }

    #[tokio::test]
    async fn test_orden_sin_distinguir_mayusculas() {
        let store = MemoryStore::new();
        for nombre in ["beta", "Charlie", "Alfa", "delta"] {
            let _: Camion = store.create(&descripcion(nombre)).await.unwrap();
        }

        let page: Page<Camion> = store.list_page(&ListFilter::default()).await.unwrap();
        let orden: Vec<&str> = page.items.iter().map(|c| c.descripcion.as_str()).collect();
        assert_eq!(orden, vec!["Alfa", "beta", "Charlie", "delta"]);
    }

    #[tokio::test]
    async fn test_borrado_restringido_por_asignaciones() {
        let store = MemoryStore::new();
        let (camion, dias) = seed(&store).await;
        store
            .replace(AssignmentSide::Camion, camion.id, &[dias[0].id])
            .await
            .unwrap();

        let err = EntityStore::<DiaEntrega>::delete(&store, dias[0].id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "REFERENTIAL");
        assert!(EntityStore::<DiaEntrega>::delete(&store, dias[1].id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_borrado_logico_de_cliente() {
        let store = MemoryStore::new();
        let cliente: Cliente = store
            .create(&[FieldChange::text("nombre", Some("Empresa ABC".into()))])
            .await
            .unwrap();
        let borrado = EntityStore::<Cliente>::delete(&store, cliente.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!borrado.activo);
        let sigue: Option<Cliente> = store.find_by_id(cliente.id).await.unwrap();
        assert!(sigue.is_some());
        assert!(store.list_activos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reemplazo_atomico_ante_fallo() {
        let store = MemoryStore::new();
        let (camion, dias) = seed(&store).await;
        store
            .replace(AssignmentSide::Camion, camion.id, &[dias[0].id])
            .await
            .unwrap();

        store.fail_next_replace_after(1);
        let result = store
            .replace(AssignmentSide::Camion, camion.id, &[dias[1].id, dias[2].id])
            .await;
        assert!(result.is_err());

        let actuales = store
            .list_counterparts(AssignmentSide::Camion, camion.id)
            .await
            .unwrap();
        assert_eq!(actuales.iter().map(|d| d.id).collect::<Vec<_>>(), vec![dias[0].id]);

        // El failpoint es de un solo uso
        store
            .replace(AssignmentSide::Camion, camion.id, &[dias[2].id, dias[1].id])
            .await
            .unwrap();
        let nuevos = store
            .list_counterparts(AssignmentSide::Camion, camion.id)
            .await
            .unwrap();
        assert_eq!(nuevos.iter().map(|d| d.id).collect::<Vec<_>>(), vec![dias[1].id, dias[2].id]);
    }

    #[tokio::test]
    async fn test_reemplazo_con_ids_inexistentes() {
        let store = MemoryStore::new();
        let (camion, dias) = seed(&store).await;
        let err = store
            .replace(AssignmentSide::Camion, camion.id, &[dias[0].id, 99])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref msg) if msg.contains("99")));

        let err = store
            .replace(AssignmentSide::DiaEntrega, 42, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_vista_inversa() {
        let store = MemoryStore::new();
        let (camion, dias) = seed(&store).await;
        store
            .replace(AssignmentSide::Camion, camion.id, &[dias[1].id, dias[1].id])
            .await
            .unwrap();

        let camiones = store
            .list_counterparts(AssignmentSide::DiaEntrega, dias[1].id)
            .await
            .unwrap();
        assert_eq!(camiones, vec![AssignedEntity { id: camion.id, descripcion: "Truck A".into() }]);

        let todos = store
            .list_with_counterparts(AssignmentSide::DiaEntrega)
            .await
            .unwrap();
        assert_eq!(todos.len(), 3);
        assert_eq!(todos[1].asignados.len(), 1);
        assert!(todos[0].asignados.is_empty());
    }

    fn usuario(email: &str, rol: &str, activo: bool) -> Vec<FieldChange> {
        vec![
            FieldChange::text("email", Some(email.to_string())),
            FieldChange::text("password", Some("hash".to_string())),
            FieldChange::text("nombre", Some("Nombre".to_string())),
            FieldChange::text("apellido", Some("Apellido".to_string())),
            FieldChange::text("rol", Some(rol.to_string())),
            FieldChange::boolean("activo", activo),
        ]
    }

    #[tokio::test]
    async fn test_usuarios_email_unico_y_estadisticas() {
        let store = MemoryStore::new();
        let admin: Usuario = store.create(&usuario("admin@a.cl", "admin", true)).await.unwrap();
        let _: Usuario = store.create(&usuario("user@a.cl", "user", true)).await.unwrap();
        let _: Usuario = store.create(&usuario("off@a.cl", "user", false)).await.unwrap();

        let err = EntityStore::<Usuario>::create(&store, &usuario("admin@a.cl", "user", true))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE");

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.activos, 2);
        assert_eq!(stats.inactivos, 1);
        assert_eq!(stats.por_rol.get("user"), Some(&2));
        assert_eq!(stats.por_rol.get("admin"), Some(&1));

        let found = store.find_by_email("admin@a.cl").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert!(found.last_login.is_none());
        let logged = store.record_login(admin.id).await.unwrap().unwrap();
        assert!(logged.last_login.is_some());
        assert!(store.record_login(99).await.unwrap().is_none());
    }
}
