//! Modelo de cuenta de usuario
//!
//! Cuentas del sistema identificadas por número de ID nacional. Las cuentas
//! DRIVER y MARSHALL poseen exactamente un perfil en su tabla respectiva.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rol de la cuenta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Driver,
    Marshall,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Driver => "DRIVER",
            UserRole::Marshall => "MARSHALL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "ADMIN" => Some(UserRole::Admin),
            "DRIVER" => Some(UserRole::Driver),
            "MARSHALL" => Some(UserRole::Marshall),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id_number: i64,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub email: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Driver, UserRole::Marshall] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("conductor"), None);
    }
}
