//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de cuentas autenticadas. El principal autenticado se
//! inyecta en las extensions del request y los handlers lo consumen tal
//! cual; es la fuente del `assigned_by` que estampa el ledger.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtService;

/// Principal autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id_number: i64,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Identidad con la que se estampan las operaciones del ledger
    pub fn actor(&self) -> String {
        self.id_number.to_string()
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let jwt_service = JwtService::new(
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    );
    let id_number = jwt_service.get_account_id(auth_header)?;

    // Verificar que la cuenta sigue existiendo y está habilitada
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(id_number)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account not found".to_string()))?;

    if !user.enabled {
        return Err(AppError::Unauthorized("Account is disabled".to_string()));
    }

    let role = UserRole::parse(&user.role)
        .ok_or_else(|| AppError::Unauthorized("Account has an unknown role".to_string()))?;

    log::debug!("🔐 Cuenta {} autenticada con rol {}", id_number, user.role);

    request
        .extensions_mut()
        .insert(AuthenticatedUser { id_number, role });

    Ok(next.run(request).await)
}

/// Check de autorización por roles, usado al inicio de cada handler
/// protegido
pub fn require_any_role(user: &AuthenticatedUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to perform this operation".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_any_role() {
        let marshall = AuthenticatedUser {
            id_number: 34567890,
            role: UserRole::Marshall,
        };

        assert!(require_any_role(&marshall, &[UserRole::Marshall, UserRole::Admin]).is_ok());
        assert!(require_any_role(&marshall, &[UserRole::Admin]).is_err());
    }

    #[test]
    fn test_actor_is_id_number() {
        let user = AuthenticatedUser {
            id_number: 12345678,
            role: UserRole::Admin,
        };
        assert_eq!(user.actor(), "12345678");
    }
}
