//! Repositorio de Routes

use sqlx::PgPool;

use crate::models::route::Route;
use crate::utils::errors::AppError;

const ROUTE_COLUMNS: &str =
    "route_id, name, start_point, end_point, start_marshall_id, end_marshall_id";

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        start_point: &str,
        end_point: &str,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(&format!(
            r#"
            INSERT INTO routes (name, start_point, end_point)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        ))
        .bind(name)
        .bind(start_point)
        .bind(end_point)
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(&self, route_id: i64) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(&format!(
            "SELECT {} FROM routes WHERE route_id = $1",
            ROUTE_COLUMNS
        ))
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(&format!(
            "SELECT {} FROM routes WHERE name = $1",
            ROUTE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_all(&self) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(&format!(
            "SELECT {} FROM routes ORDER BY route_id",
            ROUTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn update(
        &self,
        route_id: i64,
        name: &str,
        start_point: &str,
        end_point: &str,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(&format!(
            r#"
            UPDATE routes
            SET name = $2, start_point = $3, end_point = $4
            WHERE route_id = $1
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        ))
        .bind(route_id)
        .bind(name)
        .bind(start_point)
        .bind(end_point)
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn delete(&self, route_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM routes WHERE route_id = $1")
            .bind(route_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
