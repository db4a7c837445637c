//! Repositorio de Matatus

use sqlx::PgPool;

use crate::models::matatu::Matatu;
use crate::utils::errors::AppError;

const MATATU_COLUMNS: &str =
    "plate_number, capacity, model, status, route_id, current_stage, trip_count, created_at";

pub struct MatatuRepository {
    pool: PgPool,
}

impl MatatuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        plate_number: &str,
        capacity: i32,
        model: &str,
        status: &str,
        route_id: i64,
    ) -> Result<Matatu, AppError> {
        let matatu = sqlx::query_as::<_, Matatu>(&format!(
            r#"
            INSERT INTO matatus (plate_number, capacity, model, status, route_id, current_stage, trip_count)
            VALUES ($1, $2, $3, $4, $5, NULL, 0)
            RETURNING {}
            "#,
            MATATU_COLUMNS
        ))
        .bind(plate_number)
        .bind(capacity)
        .bind(model)
        .bind(status)
        .bind(route_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(matatu)
    }

    pub async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Matatu>, AppError> {
        let matatu = sqlx::query_as::<_, Matatu>(&format!(
            "SELECT {} FROM matatus WHERE plate_number = $1",
            MATATU_COLUMNS
        ))
        .bind(plate_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(matatu)
    }

    pub async fn find_all(&self) -> Result<Vec<Matatu>, AppError> {
        let matatus = sqlx::query_as::<_, Matatu>(&format!(
            "SELECT {} FROM matatus ORDER BY created_at DESC",
            MATATU_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(matatus)
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<Matatu>, AppError> {
        let matatus = sqlx::query_as::<_, Matatu>(&format!(
            "SELECT {} FROM matatus WHERE status = $1 ORDER BY plate_number",
            MATATU_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(matatus)
    }

    pub async fn find_by_route(&self, route_id: i64) -> Result<Vec<Matatu>, AppError> {
        let matatus = sqlx::query_as::<_, Matatu>(&format!(
            "SELECT {} FROM matatus WHERE route_id = $1 ORDER BY plate_number",
            MATATU_COLUMNS
        ))
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(matatus)
    }

    pub async fn update(
        &self,
        plate_number: &str,
        capacity: i32,
        model: &str,
        status: &str,
        route_id: i64,
    ) -> Result<Matatu, AppError> {
        let matatu = sqlx::query_as::<_, Matatu>(&format!(
            r#"
            UPDATE matatus
            SET capacity = $2, model = $3, status = $4, route_id = $5
            WHERE plate_number = $1
            RETURNING {}
            "#,
            MATATU_COLUMNS
        ))
        .bind(plate_number)
        .bind(capacity)
        .bind(model)
        .bind(status)
        .bind(route_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(matatu)
    }

    pub async fn delete(&self, plate_number: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM matatus WHERE plate_number = $1")
            .bind(plate_number)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM matatus")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    /// True si el matatu tiene una asignación activa o un check-in abierto.
    /// Se usa como guard antes de borrar.
    pub async fn has_open_references(&self, plate_number: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM driver_vehicle_assignments
                WHERE plate_number = $1 AND released_at IS NULL
            ) OR EXISTS(
                SELECT 1 FROM check_in_out_logs
                WHERE plate_number = $1 AND check_out_time IS NULL
            )
            "#,
        )
        .bind(plate_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}
