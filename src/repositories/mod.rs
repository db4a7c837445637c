//! Repositorios de acceso a datos
//!
//! Cada repositorio posee un pool y expone consultas tipadas. Las
//! mutaciones que pertenecen a una transacción de negocio (ledger de
//! asignaciones, ciclo check-in/check-out, colocación de marshalls) viven
//! en sus servicios, que leen y escriben dentro de sus propias
//! transacciones.

pub mod assignment_repository;
pub mod marshall_repository;
pub mod matatu_repository;
pub mod route_repository;
pub mod user_repository;
