//! Ledger de asignaciones conductor↔vehículo
//!
//! Cada operación pública corre dentro de una transacción: todos los checks
//! de exclusividad se evalúan antes de cualquier mutación, y los índices
//! únicos parciales (`released_at IS NULL`) actúan de respaldo si dos
//! requests concurrentes pasan el check al mismo tiempo.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::dto::assignment_dto::{AssignmentRow, AssignmentSummary, DriverInfo, VehicleInfo};
use crate::models::assignment::DriverVehicleAssignment;
use crate::models::driver::Driver;
use crate::models::matatu::Matatu;
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::canonical_plate;

const ASSIGNMENT_COLUMNS: &str =
    "id, driver_id, plate_number, assigned_at, assigned_by, released_at, released_by";

pub struct AssignmentService {
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Asigna un vehículo a un conductor. Falla con Conflict si cualquiera
    /// de los dos lados ya tiene una asignación activa, sin mutar nada.
    pub async fn assign(
        &self,
        driver_id: i64,
        plate_number: &str,
        actor: &str,
    ) -> Result<AssignmentSummary, AppError> {
        let plate = canonical_plate(plate_number);
        let mut tx = self.pool.begin().await?;

        let driver = find_driver(&mut tx, driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver not found with ID: {}", driver_id)))?;

        let matatu = find_matatu(&mut tx, &plate)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Matatu not found with plate number: {}", plate)))?;

        if active_assignment_exists_for_driver(&mut tx, driver_id).await? {
            return Err(AppError::Conflict(
                "Driver already has an active vehicle assignment".to_string(),
            ));
        }

        if active_assignment_exists_for_vehicle(&mut tx, &plate).await? {
            return Err(AppError::Conflict(
                "Vehicle is already assigned to another driver".to_string(),
            ));
        }

        let assignment = insert_assignment(&mut tx, driver_id, &plate, actor).await?;
        let route_name = route_name_for(&mut tx, &matatu).await?;

        tx.commit().await?;

        info!(
            "🔗 Matatu {} asignado al conductor {} por {}",
            plate, driver_id, actor
        );
        Ok(build_summary(driver, matatu, route_name, &assignment))
    }

    /// Libera la asignación activa de un conductor. Repetir la llamada tras
    /// el éxito devuelve NotFound, nunca un éxito silencioso.
    pub async fn unassign(&self, driver_id: i64, actor: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        find_driver(&mut tx, driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver not found with ID: {}", driver_id)))?;

        let released = sqlx::query(
            r#"
            UPDATE driver_vehicle_assignments
            SET released_at = $2, released_by = $3
            WHERE driver_id = $1 AND released_at IS NULL
            "#,
        )
        .bind(driver_id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&mut *tx)
        .await?;

        if released.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Driver does not have an active vehicle assignment".to_string(),
            ));
        }

        tx.commit().await?;

        info!("🔓 Asignación del conductor {} liberada por {}", driver_id, actor);
        Ok(())
    }

    /// Reasigna un conductor a otro vehículo: cierra la asignación activa
    /// (si existe) y abre la nueva en la misma transacción. La exclusividad
    /// del vehículo destino se revalida después del cierre.
    pub async fn reassign(
        &self,
        driver_id: i64,
        plate_number: &str,
        actor: &str,
    ) -> Result<AssignmentSummary, AppError> {
        let plate = canonical_plate(plate_number);
        let mut tx = self.pool.begin().await?;

        let driver = find_driver(&mut tx, driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver not found with ID: {}", driver_id)))?;

        let matatu = find_matatu(&mut tx, &plate)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Matatu not found with plate number: {}", plate)))?;

        sqlx::query(
            r#"
            UPDATE driver_vehicle_assignments
            SET released_at = $2, released_by = $3
            WHERE driver_id = $1 AND released_at IS NULL
            "#,
        )
        .bind(driver_id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&mut *tx)
        .await?;

        if active_assignment_exists_for_vehicle(&mut tx, &plate).await? {
            return Err(AppError::Conflict(
                "Vehicle is already assigned to another driver".to_string(),
            ));
        }

        let assignment = insert_assignment(&mut tx, driver_id, &plate, actor).await?;
        let route_name = route_name_for(&mut tx, &matatu).await?;

        tx.commit().await?;

        info!(
            "🔗 Conductor {} reasignado al matatu {} por {}",
            driver_id, plate, actor
        );
        Ok(build_summary(driver, matatu, route_name, &assignment))
    }

    /// Asignaciones activas, más reciente primero
    pub async fn assignments(&self) -> Result<Vec<AssignmentRow>, AppError> {
        let repository = AssignmentRepository::new(self.pool.clone());
        let rows = repository
            .list_active()
            .await?
            .into_iter()
            .map(|a| AssignmentRow {
                driver_id: a.driver_id,
                matatu_plate: a.plate_number,
                assigned_at: a.assigned_at,
                assigned_by: a.assigned_by,
            })
            .collect();

        Ok(rows)
    }

    /// Conductores sin fila en el conjunto de asignaciones activas:
    /// diferencia de conjuntos sobre el ledger
    pub async fn unassigned_drivers(&self) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT driver_id, firstname, lastname, email, phone_number, license_number
            FROM drivers d
            WHERE NOT EXISTS (
                SELECT 1 FROM driver_vehicle_assignments a
                WHERE a.driver_id = d.driver_id AND a.released_at IS NULL
            )
            ORDER BY d.driver_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}

async fn find_driver(tx: &mut PgConnection, driver_id: i64) -> Result<Option<Driver>, AppError> {
    let driver = sqlx::query_as::<_, Driver>(
        "SELECT driver_id, firstname, lastname, email, phone_number, license_number FROM drivers WHERE driver_id = $1",
    )
    .bind(driver_id)
    .fetch_optional(tx)
    .await?;

    Ok(driver)
}

async fn find_matatu(tx: &mut PgConnection, plate: &str) -> Result<Option<Matatu>, AppError> {
    let matatu = sqlx::query_as::<_, Matatu>(
        "SELECT plate_number, capacity, model, status, route_id, current_stage, trip_count, created_at FROM matatus WHERE plate_number = $1",
    )
    .bind(plate)
    .fetch_optional(tx)
    .await?;

    Ok(matatu)
}

async fn active_assignment_exists_for_driver(
    tx: &mut PgConnection,
    driver_id: i64,
) -> Result<bool, AppError> {
    let result: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM driver_vehicle_assignments WHERE driver_id = $1 AND released_at IS NULL)",
    )
    .bind(driver_id)
    .fetch_one(tx)
    .await?;

    Ok(result.0)
}

async fn active_assignment_exists_for_vehicle(
    tx: &mut PgConnection,
    plate: &str,
) -> Result<bool, AppError> {
    let result: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM driver_vehicle_assignments WHERE plate_number = $1 AND released_at IS NULL)",
    )
    .bind(plate)
    .fetch_one(tx)
    .await?;

    Ok(result.0)
}

async fn insert_assignment(
    tx: &mut PgConnection,
    driver_id: i64,
    plate: &str,
    actor: &str,
) -> Result<DriverVehicleAssignment, AppError> {
    sqlx::query_as::<_, DriverVehicleAssignment>(&format!(
        r#"
        INSERT INTO driver_vehicle_assignments (driver_id, plate_number, assigned_at, assigned_by)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        ASSIGNMENT_COLUMNS
    ))
    .bind(driver_id)
    .bind(plate)
    .bind(Utc::now())
    .bind(actor)
    .fetch_one(tx)
    .await
    .map_err(|e| {
        // el índice único parcial es el respaldo contra la ventana
        // check-then-act entre requests concurrentes
        if is_unique_violation(&e) {
            AppError::Conflict("An active assignment already exists for this driver or vehicle".to_string())
        } else {
            AppError::Database(e)
        }
    })
}

async fn route_name_for(tx: &mut PgConnection, matatu: &Matatu) -> Result<Option<String>, AppError> {
    let Some(route_id) = matatu.route_id else {
        return Ok(None);
    };

    let name: Option<(String,)> = sqlx::query_as("SELECT name FROM routes WHERE route_id = $1")
        .bind(route_id)
        .fetch_optional(tx)
        .await?;

    Ok(name.map(|n| n.0))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn build_summary(
    driver: Driver,
    matatu: Matatu,
    route_name: Option<String>,
    assignment: &DriverVehicleAssignment,
) -> AssignmentSummary {
    AssignmentSummary {
        driver: DriverInfo {
            firstname: driver.firstname,
            lastname: driver.lastname,
            contact: driver.phone_number,
            license_number: driver.license_number,
            email: driver.email,
        },
        vehicle: VehicleInfo {
            capacity: matatu.capacity,
            model: matatu.model,
            status: matatu.status,
            route: route_name,
        },
        assigned_at: assignment.assigned_at,
        assigned_by: assignment.assigned_by.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_driver() -> Driver {
        Driver {
            driver_id: 34567890,
            firstname: "James".to_string(),
            lastname: "Mwangi".to_string(),
            email: "james@example.com".to_string(),
            phone_number: Some("+254745115711".to_string()),
            license_number: "DL-009876".to_string(),
        }
    }

    fn sample_matatu() -> Matatu {
        Matatu {
            plate_number: "KBX 123A".to_string(),
            capacity: 14,
            model: "Nissan Caravan".to_string(),
            status: "available".to_string(),
            route_id: Some(1),
            current_stage: None,
            trip_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_denormalizes_both_sides() {
        let assignment = DriverVehicleAssignment {
            id: 1,
            driver_id: 34567890,
            plate_number: "KBX 123A".to_string(),
            assigned_at: Utc::now(),
            assigned_by: "12345678".to_string(),
            released_at: None,
            released_by: None,
        };

        let summary = build_summary(
            sample_driver(),
            sample_matatu(),
            Some("Route 46".to_string()),
            &assignment,
        );

        assert_eq!(summary.driver.firstname, "James");
        assert_eq!(summary.driver.license_number, "DL-009876");
        assert_eq!(summary.vehicle.capacity, 14);
        assert_eq!(summary.vehicle.route.as_deref(), Some("Route 46"));
        assert_eq!(summary.assigned_by, "12345678");
    }

    #[test]
    fn test_summary_without_route() {
        let mut matatu = sample_matatu();
        matatu.route_id = None;

        let assignment = DriverVehicleAssignment {
            id: 2,
            driver_id: 34567890,
            plate_number: "KBX 123A".to_string(),
            assigned_at: Utc::now(),
            assigned_by: "admin".to_string(),
            released_at: None,
            released_by: None,
        };

        let summary = build_summary(sample_driver(), matatu, None, &assignment);
        assert!(summary.vehicle.route.is_none());
    }
}
