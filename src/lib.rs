//! Backend REST de logística de entregas: clientes, camiones, días de
//! entrega, la asignación camiones ↔ días y las cuentas de usuario.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;
pub mod validators;

pub use routes::create_app;
pub use state::{AppState, Stores};
