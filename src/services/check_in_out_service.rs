//! Motor de transición de stages
//!
//! Maneja el ciclo check-in/check-out de un matatu entre los dos extremos
//! de su ruta. El stage alterna estrictamente entre start_point y
//! end_point; no existen stages intermedios para efectos de check-in. El
//! contador de trips tiene un único dueño: este motor lo incrementa en el
//! check-in y estampa el mismo valor en la fila de log, así el contador del
//! vehículo y el del log no pueden divergir.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::models::check_in_out_log::CheckInOutLog;
use crate::models::matatu::{Matatu, MatatuStatus};
use crate::models::route::Route;
use crate::utils::errors::AppError;
use crate::utils::validation::canonical_plate;

const LOG_COLUMNS: &str =
    "id, plate_number, stage_name, check_in_time, check_out_time, trip_number";

pub struct CheckInOutService {
    pool: PgPool,
}

impl CheckInOutService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra el check-in del matatu en su stage actual.
    ///
    /// El primer check-in de la vida del vehículo siembra current_stage con
    /// el punto de partida de la ruta y lo persiste de inmediato.
    pub async fn check_in(&self, plate_number: &str) -> Result<CheckInOutLog, AppError> {
        let plate = canonical_plate(plate_number);
        let mut tx = self.pool.begin().await?;

        let matatu = load_matatu(&mut tx, &plate).await?;
        let route = load_route_of(&mut tx, &matatu).await?;
        ensure_operable(&matatu)?;

        let stage = match matatu.current_stage.clone() {
            Some(stage) => stage,
            None => {
                let seeded = route.start_point.clone();
                sqlx::query("UPDATE matatus SET current_stage = $2 WHERE plate_number = $1")
                    .bind(&plate)
                    .bind(&seeded)
                    .execute(&mut *tx)
                    .await?;
                seeded
            }
        };

        if open_log(&mut tx, &plate, &stage).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Matatu {} is already checked in at stage {}",
                plate, stage
            )));
        }

        let trip_number = matatu.trip_count + 1;

        sqlx::query(
            "UPDATE matatus SET trip_count = $2, status = $3 WHERE plate_number = $1",
        )
        .bind(&plate)
        .bind(trip_number)
        .bind(MatatuStatus::Boarding.as_str())
        .execute(&mut *tx)
        .await?;

        let log = sqlx::query_as::<_, CheckInOutLog>(&format!(
            r#"
            INSERT INTO check_in_out_logs (plate_number, stage_name, check_in_time, trip_number)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            LOG_COLUMNS
        ))
        .bind(&plate)
        .bind(&stage)
        .bind(Utc::now())
        .bind(trip_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // el índice único parcial sobre (plate, stage) con checkout NULL
            // cierra la ventana entre el check de arriba y este insert
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Matatu {} is already checked in at stage {}",
                    plate, stage
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;

        info!("🚌 Matatu {} check-in en {} (trip {})", plate, stage, trip_number);
        Ok(log)
    }

    /// Registra el check-out del matatu: cierra la fila abierta, voltea el
    /// stage al extremo opuesto de la ruta y marca el vehículo enroute.
    pub async fn check_out(&self, plate_number: &str) -> Result<CheckInOutLog, AppError> {
        let plate = canonical_plate(plate_number);
        let mut tx = self.pool.begin().await?;

        let matatu = load_matatu(&mut tx, &plate).await?;
        let route = load_route_of(&mut tx, &matatu).await?;
        ensure_operable(&matatu)?;

        let stage = matatu.current_stage.clone().ok_or_else(|| {
            AppError::BadRequest(format!("Matatu {} is not currently checked in", plate))
        })?;

        let open = open_log(&mut tx, &plate, &stage).await?.ok_or_else(|| {
            AppError::BadRequest(format!("Matatu {} is not currently checked in", plate))
        })?;

        let log = sqlx::query_as::<_, CheckInOutLog>(&format!(
            r#"
            UPDATE check_in_out_logs
            SET check_out_time = $2
            WHERE id = $1
            RETURNING {}
            "#,
            LOG_COLUMNS
        ))
        .bind(open.id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let next_stage = route.opposite_stage(&stage).to_string();

        sqlx::query(
            "UPDATE matatus SET current_stage = $2, status = $3 WHERE plate_number = $1",
        )
        .bind(&plate)
        .bind(&next_stage)
        .bind(MatatuStatus::Enroute.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("🚌 Matatu {} check-out de {}, enroute hacia {}", plate, stage, next_stage);
        Ok(log)
    }
}

async fn load_matatu(tx: &mut PgConnection, plate: &str) -> Result<Matatu, AppError> {
    sqlx::query_as::<_, Matatu>(
        "SELECT plate_number, capacity, model, status, route_id, current_stage, trip_count, created_at FROM matatus WHERE plate_number = $1",
    )
    .bind(plate)
    .fetch_optional(tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Matatu not found with plate number: {}", plate)))
}

async fn load_route_of(tx: &mut PgConnection, matatu: &Matatu) -> Result<Route, AppError> {
    let route_id = matatu.route_id.ok_or_else(|| {
        AppError::BadRequest("Matatu is not assigned to any route".to_string())
    })?;

    sqlx::query_as::<_, Route>(
        "SELECT route_id, name, start_point, end_point, start_marshall_id, end_marshall_id FROM routes WHERE route_id = $1",
    )
    .bind(route_id)
    .fetch_optional(tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Route not found with ID: {}", route_id)))
}

/// Los vehículos en mantenimiento quedan fuera del ciclo de stages
fn ensure_operable(matatu: &Matatu) -> Result<(), AppError> {
    if matatu.is_in_maintenance() {
        return Err(AppError::BadRequest("Matatu is under maintenance".to_string()));
    }
    Ok(())
}

async fn open_log(
    tx: &mut PgConnection,
    plate: &str,
    stage: &str,
) -> Result<Option<CheckInOutLog>, AppError> {
    let log = sqlx::query_as::<_, CheckInOutLog>(&format!(
        r#"
        SELECT {} FROM check_in_out_logs
        WHERE plate_number = $1 AND stage_name = $2 AND check_out_time IS NULL
        "#,
        LOG_COLUMNS
    ))
    .bind(plate)
    .bind(stage)
    .fetch_optional(tx)
    .await?;

    Ok(log)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn route() -> Route {
        Route {
            route_id: 1,
            name: "Route 46".to_string(),
            start_point: "Town".to_string(),
            end_point: "Estate".to_string(),
            start_marshall_id: None,
            end_marshall_id: None,
        }
    }

    fn matatu(status: &str, stage: Option<&str>) -> Matatu {
        Matatu {
            plate_number: "KBX 123A".to_string(),
            capacity: 14,
            model: "Nissan Caravan".to_string(),
            status: status.to_string(),
            route_id: Some(1),
            current_stage: stage.map(|s| s.to_string()),
            trip_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_maintenance_blocks_cycle() {
        assert!(ensure_operable(&matatu("in-maintenance", None)).is_err());
        assert!(ensure_operable(&matatu("available", None)).is_ok());
        assert!(ensure_operable(&matatu("boarding", Some("Town"))).is_ok());
    }

    #[test]
    fn test_stage_alternates_over_full_cycles() {
        // primer check-in siembra el punto de partida; cada check-out
        // voltea al extremo opuesto
        let r = route();
        let seeded = r.start_point.clone();
        assert_eq!(seeded, "Town");

        let after_first_checkout = r.opposite_stage(&seeded).to_string();
        assert_eq!(after_first_checkout, "Estate");

        let after_second_checkout = r.opposite_stage(&after_first_checkout).to_string();
        assert_eq!(after_second_checkout, "Town");
    }

    #[test]
    fn test_trip_number_follows_vehicle_counter() {
        let m = matatu("available", Some("Town"));
        assert_eq!(m.trip_count + 1, 1);

        let mut advanced = m;
        advanced.trip_count = 7;
        assert_eq!(advanced.trip_count + 1, 8);
    }
}
