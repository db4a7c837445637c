//! Modelo de Marshall
//!
//! Perfil del operario estacionado en un extremo de ruta. Comparte su ID
//! con la cuenta que lo posee (users.id_number).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Marshall {
    pub marshall_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub stage: String,
}
