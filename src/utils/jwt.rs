//! Servicio JWT
//!
//! Emisión y validación de tokens HS256 para las cuentas del sistema.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::Claims;
use crate::models::user::UserRole;
use crate::utils::errors::AppError;

/// Configuración JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub token_duration: Duration,
}

impl JwtConfig {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
            token_duration: Duration::hours(expiration_hours),
        }
    }
}

pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        let config = JwtConfig::new(secret.to_string(), expiration_hours);
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso para una cuenta
    pub fn generate_token(&self, id_number: i64, role: UserRole) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + self.config.token_duration;

        let claims = Claims {
            sub: id_number.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generating access token: {}", e)))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(self.config.algorithm);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }

    /// Extrae el id de cuenta del token
    pub fn get_account_id(&self, token: &str) -> Result<i64, AppError> {
        let claims = self.validate_token(token)?;
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test-secret-do-not-use-in-production", 24)
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = test_service();

        let token = jwt_service.generate_token(34567890, UserRole::Marshall).unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "34567890");
        assert_eq!(claims.role, "MARSHALL");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_get_account_id() {
        let jwt_service = test_service();
        let token = jwt_service.generate_token(12345678, UserRole::Admin).unwrap();
        assert_eq!(jwt_service.get_account_id(&token).unwrap(), 12345678);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let jwt_service = test_service();
        let token = jwt_service.generate_token(12345678, UserRole::Driver).unwrap();

        let other = JwtService::new("another-secret", 24);
        assert!(other.validate_token(&token).is_err());
    }
}
