//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el ledger de
//! asignaciones, el motor de stages, la colocación de marshalls y el
//! despacho de notificaciones.

pub mod assignment_service;
pub mod check_in_out_service;
pub mod notification_service;
pub mod route_service;
