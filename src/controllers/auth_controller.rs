//! Controller de autenticación

use bcrypt::verify;
use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::dto::user_dto::{LoginRequest, LoginResponse};
use crate::models::user::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtService;

pub struct AuthController {
    user_repository: UserRepository,
    jwt_service: JwtService,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            user_repository: UserRepository::new(pool),
            jwt_service: JwtService::new(&config.jwt_secret, config.jwt_expiration_hours),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repository
            .find_by_id(request.id_number)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !user.enabled {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !matches {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal("Account has an unknown role".to_string()))?;

        let token = self.jwt_service.generate_token(user.id_number, role)?;

        Ok(LoginResponse {
            token,
            id_number: user.id_number,
            role: role.as_str().to_string(),
        })
    }
}
