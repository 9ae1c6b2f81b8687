//! Controladores: validan, llaman a los repositorios y arman el sobre

pub mod assignment_controller;
pub mod cliente_controller;
pub mod crud_controller;
pub mod health_controller;
pub mod usuario_controller;

pub use assignment_controller::AssignmentController;
pub use cliente_controller::ClienteController;
pub use crud_controller::CrudController;
pub use health_controller::HealthController;
pub use usuario_controller::UsuarioController;
