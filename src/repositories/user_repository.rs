//! Repositorio de cuentas de usuario

use sqlx::PgPool;

use crate::models::user::UserAccount;
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id_number, password_hash, role, email, enabled, created_at";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id_number: i64) -> Result<Option<UserAccount>, AppError> {
        let user = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {} FROM users WHERE id_number = $1",
            USER_COLUMNS
        ))
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_password(
        &self,
        id_number: i64,
        password_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id_number = $1")
            .bind(id_number)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
