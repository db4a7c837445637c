//! Motor de colocación de marshalls
//!
//! Cada ruta tiene dos slots (start/end) pero la regla vigente admite una
//! sola colocación de marshall por ruta en total: cualquier slot ocupado
//! bloquea también el slot vacío. Un marshall ocupa como máximo una
//! posición en todo el sistema.

use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::models::marshall::Marshall;
use crate::models::route::Route;
use crate::utils::errors::AppError;

const ROUTE_COLUMNS: &str =
    "route_id, name, start_point, end_point, start_marshall_id, end_marshall_id";

/// Posición de un marshall sobre una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshallPosition {
    Start,
    End,
}

impl MarshallPosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "start" => Some(MarshallPosition::Start),
            "end" => Some(MarshallPosition::End),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            MarshallPosition::Start => "start_marshall_id",
            MarshallPosition::End => "end_marshall_id",
        }
    }
}

pub struct RouteService {
    pool: PgPool,
}

impl RouteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Coloca un marshall en un extremo de una ruta. Los checks corren en
    /// orden y el primero que falla gana; nada se muta en ese caso.
    pub async fn assign_marshall_to_route(
        &self,
        route_id: i64,
        marshall_id: i64,
        position: &str,
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = find_route(&mut tx, route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route not found with ID: {}", route_id)))?;

        find_marshall(&mut tx, marshall_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Marshall not found with ID: {}", marshall_id))
            })?;

        let position = MarshallPosition::parse(position).ok_or_else(|| {
            AppError::BadRequest("Invalid position. Allowed values are 'start' or 'end'.".to_string())
        })?;

        if route.holds_marshall(marshall_id) {
            return Err(AppError::Conflict(format!(
                "Marshall {} is already assigned to this route",
                marshall_id
            )));
        }

        if find_route_holding_marshall(&mut tx, marshall_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Marshall {} is already assigned to another route",
                marshall_id
            )));
        }

        // regla vigente: un slot ocupado bloquea la ruta entera, no solo
        // ese slot
        if route.has_marshall() {
            return Err(AppError::Conflict(format!(
                "Route {} is already assigned to a marshall",
                route_id
            )));
        }

        let updated = sqlx::query_as::<_, Route>(&format!(
            r#"
            UPDATE routes SET {} = $2 WHERE route_id = $1
            RETURNING {}
            "#,
            position.column(),
            ROUTE_COLUMNS
        ))
        .bind(route_id)
        .bind(marshall_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Marshall {} is already assigned to another route",
                    marshall_id
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;

        info!(
            "📍 Marshall {} colocado en la ruta {} ({:?})",
            marshall_id, route_id, position
        );
        Ok(updated)
    }

    /// Retira un marshall del slot que ocupe, donde sea que esté
    pub async fn unassign_marshall_from_route(&self, marshall_id: i64) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        find_marshall(&mut tx, marshall_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Marshall not found with ID: {}", marshall_id))
            })?;

        let route = find_route_holding_marshall(&mut tx, marshall_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Marshall {} is not assigned to any route",
                    marshall_id
                ))
            })?;

        let updated = sqlx::query_as::<_, Route>(&format!(
            r#"
            UPDATE routes
            SET start_marshall_id = CASE WHEN start_marshall_id = $2 THEN NULL ELSE start_marshall_id END,
                end_marshall_id   = CASE WHEN end_marshall_id = $2 THEN NULL ELSE end_marshall_id END
            WHERE route_id = $1
            RETURNING {}
            "#,
            ROUTE_COLUMNS
        ))
        .bind(route.route_id)
        .bind(marshall_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("📍 Marshall {} retirado de la ruta {}", marshall_id, route.route_id);
        Ok(updated)
    }

    /// True si el marshall ocupa alguno de los dos slots de la ruta dada.
    /// Una ruta inexistente cuenta como no asignada.
    pub async fn is_marshall_assigned_to_route(
        &self,
        route_id: i64,
        marshall_id: i64,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        let route = find_route(&mut conn, route_id).await?;
        Ok(route.map(|r| r.holds_marshall(marshall_id)).unwrap_or(false))
    }

    /// True si alguno de los dos slots de la ruta está ocupado
    pub async fn is_stage_assigned_to_marshall(&self, route_id: i64) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        let route = find_route(&mut conn, route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route not found with ID: {}", route_id)))?;
        Ok(route.has_marshall())
    }
}

async fn find_route(tx: &mut PgConnection, route_id: i64) -> Result<Option<Route>, AppError> {
    let route = sqlx::query_as::<_, Route>(&format!(
        "SELECT {} FROM routes WHERE route_id = $1",
        ROUTE_COLUMNS
    ))
    .bind(route_id)
    .fetch_optional(tx)
    .await?;

    Ok(route)
}

async fn find_marshall(
    tx: &mut PgConnection,
    marshall_id: i64,
) -> Result<Option<Marshall>, AppError> {
    let marshall = sqlx::query_as::<_, Marshall>(
        "SELECT marshall_id, firstname, lastname, email, phone_number, stage FROM marshalls WHERE marshall_id = $1",
    )
    .bind(marshall_id)
    .fetch_optional(tx)
    .await?;

    Ok(marshall)
}

async fn find_route_holding_marshall(
    tx: &mut PgConnection,
    marshall_id: i64,
) -> Result<Option<Route>, AppError> {
    let route = sqlx::query_as::<_, Route>(&format!(
        "SELECT {} FROM routes WHERE start_marshall_id = $1 OR end_marshall_id = $1",
        ROUTE_COLUMNS
    ))
    .bind(marshall_id)
    .fetch_optional(tx)
    .await?;

    Ok(route)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse_is_case_insensitive() {
        assert_eq!(MarshallPosition::parse("start"), Some(MarshallPosition::Start));
        assert_eq!(MarshallPosition::parse("END"), Some(MarshallPosition::End));
        assert_eq!(MarshallPosition::parse(" Start "), Some(MarshallPosition::Start));
        assert_eq!(MarshallPosition::parse("middle"), None);
        assert_eq!(MarshallPosition::parse(""), None);
    }

    #[test]
    fn test_position_column_mapping() {
        assert_eq!(MarshallPosition::Start.column(), "start_marshall_id");
        assert_eq!(MarshallPosition::End.column(), "end_marshall_id");
    }

    #[test]
    fn test_any_occupied_slot_blocks_route() {
        // un end marshall presente bloquea también el slot start vacío
        let route = Route {
            route_id: 9,
            name: "Route 111".to_string(),
            start_point: "Town".to_string(),
            end_point: "Ngong".to_string(),
            start_marshall_id: None,
            end_marshall_id: Some(42),
        };
        assert!(route.has_marshall());
        assert!(!route.holds_marshall(7));
    }
}
