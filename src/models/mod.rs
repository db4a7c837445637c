//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod assignment;
pub mod auth;
pub mod check_in_out_log;
pub mod driver;
pub mod marshall;
pub mod matatu;
pub mod route;
pub mod user;
