//! Read-only aggregates over the `water_logs` table.

use nutriquest_core::types::{DbId, GameDate};
use sqlx::PgPool;

pub struct WaterLogRepo;

impl WaterLogRepo {
    /// Total glasses logged by a user on `date` (0 if none).
    pub async fn daily_glasses(
        pool: &PgPool,
        user_id: DbId,
        date: GameDate,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(SUM(glasses), 0)::INTEGER FROM water_logs
             WHERE user_id = $1 AND log_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }
}
