//! Modelo de DriverVehicleAssignment
//!
//! Una fila por emparejamiento conductor↔vehículo. La asignación activa es
//! la que tiene released_at en NULL; liberar una asignación estampa
//! released_at en lugar de borrar la fila, así el historial se conserva y
//! los índices únicos parciales pueden respaldar la exclusividad.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverVehicleAssignment {
    pub id: i64,
    pub driver_id: i64,
    pub plate_number: String,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: String,
    pub released_at: Option<DateTime<Utc>>,
    pub released_by: Option<String>,
}
