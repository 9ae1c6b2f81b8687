//! Validadores de payloads por entidad
//!
//! Funciones puras que devuelven todas las violaciones encontradas, en el
//! orden de los campos. La variante `_patch` sólo revisa los campos
//! presentes.

pub mod camion;
pub mod cliente;
pub mod dia_entrega;
pub mod usuario;
