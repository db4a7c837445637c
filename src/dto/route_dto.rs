//! DTOs de Routes y colocación de marshalls

use serde::Deserialize;
use validator::Validate;

/// Request para crear o actualizar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct RouteRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Start point is required"))]
    pub start_point: String,

    #[validate(length(min = 1, message = "End point is required"))]
    pub end_point: String,
}

/// Request para colocar un marshall en un extremo de ruta
#[derive(Debug, Deserialize, Validate)]
pub struct MarshallPlacementRequest {
    pub route_id: i64,
    pub marshall_id: i64,

    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
}

/// Request para retirar un marshall de su ruta
#[derive(Debug, Deserialize)]
pub struct MarshallRemovalRequest {
    pub marshall_id: i64,
}
