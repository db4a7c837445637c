//! DTOs de asignación conductor↔vehículo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_plate_number;

/// Request para asignar o reasignar un vehículo a un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct AssignmentRequest {
    pub driver_id: i64,

    #[validate(custom = "validate_plate_number")]
    pub plate_number: String,
}

/// Vista denormalizada del conductor dentro del resumen de asignación
#[derive(Debug, Serialize)]
pub struct DriverInfo {
    pub firstname: String,
    pub lastname: String,
    pub contact: Option<String>,
    pub license_number: String,
    pub email: String,
}

/// Vista denormalizada del vehículo dentro del resumen de asignación
#[derive(Debug, Serialize)]
pub struct VehicleInfo {
    pub capacity: i32,
    pub model: String,
    pub status: String,
    pub route: Option<String>,
}

/// Resumen que reciben los callers externos: atributos denormalizados en
/// lugar de foreign keys, para desacoplar el contrato del storage.
#[derive(Debug, Serialize)]
pub struct AssignmentSummary {
    pub driver: DriverInfo,
    pub vehicle: VehicleInfo,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: String,
}

/// Fila de listado de asignaciones activas
#[derive(Debug, Serialize)]
pub struct AssignmentRow {
    pub driver_id: i64,
    pub matatu_plate: String,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: String,
}
