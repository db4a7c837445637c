//! Controllers de la aplicación
//!
//! Orquestan DTOs, servicios y repositorios; los handlers de routes los
//! construyen por request con un clone del pool.

pub mod admin_controller;
pub mod auth_controller;
pub mod matatu_controller;
pub mod route_controller;
