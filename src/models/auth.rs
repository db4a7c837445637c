//! Modelos de autenticación

use serde::{Deserialize, Serialize};

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // id_number de la cuenta
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}
