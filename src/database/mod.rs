//! Módulo de base de datos
//!
//! Maneja la conexión y el ciclo de vida del pool de PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;
