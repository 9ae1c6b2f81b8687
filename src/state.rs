//! Estado compartido de la aplicación
//!
//! Este módulo define el estado compartido que se pasa a través del router
//! de Axum. Los controladores reciben los repositorios como `Arc<dyn Trait>`,
//! de modo que el mismo router funciona sobre PostgreSQL o en memoria.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::{
    AssignmentController, ClienteController, CrudController, HealthController, UsuarioController,
};
use crate::database::DatabaseConnection;
use crate::models::{Camion, Cliente, DiaEntrega, Usuario};
use crate::repositories::store::{
    AssignmentStore, ClienteStore, EntityStore, StoreHealth, UsuarioStore,
};
use crate::repositories::{MemoryStore, PgAssignmentRepository, PgRepository};

/// Repositorios de un backend de persistencia
#[derive(Clone)]
pub struct Stores {
    pub clientes: Arc<dyn EntityStore<Cliente>>,
    pub camiones: Arc<dyn EntityStore<Camion>>,
    pub dias_entrega: Arc<dyn EntityStore<DiaEntrega>>,
    pub usuarios: Arc<dyn EntityStore<Usuario>>,
    pub cliente_queries: Arc<dyn ClienteStore>,
    pub usuario_queries: Arc<dyn UsuarioStore>,
    pub asignaciones: Arc<dyn AssignmentStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    pub fn postgres(db: DatabaseConnection) -> Self {
        let pool = db.pool().clone();
        let clientes = Arc::new(PgRepository::<Cliente>::new(pool.clone()));
        let usuarios = Arc::new(PgRepository::<Usuario>::new(pool.clone()));

        Self {
            clientes: clientes.clone(),
            camiones: Arc::new(PgRepository::<Camion>::new(pool.clone())),
            dias_entrega: Arc::new(PgRepository::<DiaEntrega>::new(pool.clone())),
            usuarios: usuarios.clone(),
            cliente_queries: clientes,
            usuario_queries: usuarios,
            asignaciones: Arc::new(PgAssignmentRepository::new(pool)),
            health: Arc::new(db),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            clientes: store.clone(),
            camiones: store.clone(),
            dias_entrega: store.clone(),
            usuarios: store.clone(),
            cliente_queries: store.clone(),
            usuario_queries: store.clone(),
            asignaciones: store.clone(),
            health: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub clientes: Arc<CrudController<Cliente>>,
    pub camiones: Arc<CrudController<Camion>>,
    pub dias_entrega: Arc<CrudController<DiaEntrega>>,
    pub usuarios: Arc<CrudController<Usuario>>,
    pub cliente_queries: Arc<ClienteController>,
    pub cuentas: Arc<UsuarioController>,
    pub asignaciones: Arc<AssignmentController>,
    pub health: Arc<HealthController>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, stores: Stores) -> Self {
        let health = HealthController::new(stores.health, config.environment.clone());

        Self {
            clientes: Arc::new(CrudController::new(
                stores.clientes,
                stores.asignaciones.clone(),
            )),
            camiones: Arc::new(CrudController::new(
                stores.camiones,
                stores.asignaciones.clone(),
            )),
            dias_entrega: Arc::new(CrudController::new(
                stores.dias_entrega,
                stores.asignaciones.clone(),
            )),
            usuarios: Arc::new(CrudController::new(
                stores.usuarios.clone(),
                stores.asignaciones.clone(),
            )),
            cliente_queries: Arc::new(ClienteController::new(stores.cliente_queries)),
            cuentas: Arc::new(UsuarioController::new(
                stores.usuarios,
                stores.usuario_queries,
                config.password_cost,
            )),
            asignaciones: Arc::new(AssignmentController::new(stores.asignaciones)),
            health: Arc::new(health),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<CrudController<Cliente>> {
    fn from_ref(state: &AppState) -> Self {
        state.clientes.clone()
    }
}

impl FromRef<AppState> for Arc<CrudController<Camion>> {
    fn from_ref(state: &AppState) -> Self {
        state.camiones.clone()
    }
}

impl FromRef<AppState> for Arc<CrudController<DiaEntrega>> {
    fn from_ref(state: &AppState) -> Self {
        state.dias_entrega.clone()
    }
}

impl FromRef<AppState> for Arc<CrudController<Usuario>> {
    fn from_ref(state: &AppState) -> Self {
        state.usuarios.clone()
    }
}

impl FromRef<AppState> for Arc<UsuarioController> {
    fn from_ref(state: &AppState) -> Self {
        state.cuentas.clone()
    }
}

impl FromRef<AppState> for Arc<ClienteController> {
    fn from_ref(state: &AppState) -> Self {
        state.cliente_queries.clone()
    }
}

impl FromRef<AppState> for Arc<AssignmentController> {
    fn from_ref(state: &AppState) -> Self {
        state.asignaciones.clone()
    }
}

impl FromRef<AppState> for Arc<HealthController> {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}
