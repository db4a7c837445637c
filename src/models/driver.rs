//! Modelo de Driver
//!
//! El perfil de conductor comparte su ID con la cuenta que lo posee
//! (users.id_number); la relación se resuelve por query, no por referencia
//! embebida.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub driver_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub license_number: String,
}
