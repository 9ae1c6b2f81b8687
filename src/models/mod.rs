//! Modelos del sistema
//!
//! Cada modelo mapea exactamente una tabla del esquema PostgreSQL.

pub mod asignacion;
pub mod camion;
pub mod cliente;
pub mod dia_entrega;
pub mod entity;
pub mod usuario;

pub use asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
pub use camion::Camion;
pub use cliente::{Cliente, Ubicacion};
pub use dia_entrega::DiaEntrega;
pub use entity::{Entity, EntityId};
pub use usuario::{Usuario, UsuarioStats};
