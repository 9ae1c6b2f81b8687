//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación y contraseñas.

pub mod errors;
pub mod password;
pub mod validation;
