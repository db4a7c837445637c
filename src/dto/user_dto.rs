//! DTOs de cuentas de usuario

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_account_role, validate_phone_number};

/// Request para crear una cuenta con su perfil (DRIVER o MARSHALL)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub id_number: i64,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(custom = "validate_account_role")]
    pub role: String,

    #[validate(length(min = 1, message = "Firstname is required"))]
    pub firstname: String,

    #[validate(length(min = 1, message = "Lastname is required"))]
    pub lastname: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,

    // Solo para DRIVER
    pub license_number: Option<String>,

    // Solo para MARSHALL
    pub stage: Option<String>,
}

/// Request para cambiar la contraseña de una cuenta
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id_number: i64,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id_number: i64,
    pub role: String,
}

/// Perfil devuelto por los listados de administración
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id_number: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub license_number: Option<String>,
    pub role: String,
    pub enabled: bool,
}
