//! Capa de persistencia

pub mod asignacion_repository;
pub mod memory_repository;
pub mod pg_repository;
pub mod store;

pub use asignacion_repository::PgAssignmentRepository;
pub use memory_repository::MemoryStore;
pub use pg_repository::PgRepository;
pub use store::{AssignmentStore, ClienteStore, EntityStore, StoreHealth};
