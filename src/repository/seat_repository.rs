use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{error::Result, repository::SeatRepository};

pub struct SqliteSeatRepository {
    pool: SqlitePool,
}

impl SqliteSeatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatRepository for SqliteSeatRepository {
    async fn list_available_numbers(&self, flight_id: Uuid) -> Result<Vec<String>> {
        let numbers = sqlx::query_scalar::<_, String>(
            r#"
            SELECT seat_number
            FROM seats
            WHERE flight_id = ? AND available = TRUE
            ORDER BY seat_number
            "#,
        )
        .bind(flight_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers)
    }
}
