//! Repositorio de Marshalls

use sqlx::PgPool;

use crate::models::marshall::Marshall;
use crate::utils::errors::AppError;

pub struct MarshallRepository {
    pool: PgPool,
}

impl MarshallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, marshall_id: i64) -> Result<Option<Marshall>, AppError> {
        let marshall = sqlx::query_as::<_, Marshall>(
            "SELECT marshall_id, firstname, lastname, email, phone_number, stage FROM marshalls WHERE marshall_id = $1",
        )
        .bind(marshall_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(marshall)
    }
}
