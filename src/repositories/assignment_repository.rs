//! Repositorio del ledger de asignaciones
//!
//! Solo lecturas; las mutaciones del ledger viven en el servicio de
//! asignaciones porque corren dentro de sus transacciones.

use sqlx::PgPool;

use crate::models::assignment::DriverVehicleAssignment;
use crate::utils::errors::AppError;

const ASSIGNMENT_COLUMNS: &str =
    "id, driver_id, plate_number, assigned_at, assigned_by, released_at, released_by";

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_active_by_driver(
        &self,
        driver_id: i64,
    ) -> Result<Option<DriverVehicleAssignment>, AppError> {
        let assignment = sqlx::query_as::<_, DriverVehicleAssignment>(&format!(
            r#"
            SELECT {} FROM driver_vehicle_assignments
            WHERE driver_id = $1 AND released_at IS NULL
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn list_active(&self) -> Result<Vec<DriverVehicleAssignment>, AppError> {
        let assignments = sqlx::query_as::<_, DriverVehicleAssignment>(&format!(
            r#"
            SELECT {} FROM driver_vehicle_assignments
            WHERE released_at IS NULL
            ORDER BY assigned_at DESC
            "#,
            ASSIGNMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }
}
