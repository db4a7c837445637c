//! DTOs de Matatus

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_plate_number;

/// Request para crear un matatu. La ruta se referencia por nombre y debe
/// existir antes de registrar el vehículo.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatatuRequest {
    #[validate(custom = "validate_plate_number")]
    pub plate_number: String,

    #[validate(range(min = 14, message = "Capacity must be at least 14"))]
    pub capacity: i32,

    #[validate(length(min = 1, max = 20, message = "Model must not exceed 20 characters"))]
    pub model: String,

    pub status: Option<String>,

    #[validate(length(min = 1, message = "Route is required"))]
    pub route: String,
}

/// Request para actualizar un matatu existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMatatuRequest {
    #[validate(range(min = 14, message = "Capacity must be at least 14"))]
    pub capacity: Option<i32>,

    #[validate(length(min = 1, max = 20, message = "Model must not exceed 20 characters"))]
    pub model: Option<String>,

    pub status: Option<String>,

    pub route: Option<String>,
}
