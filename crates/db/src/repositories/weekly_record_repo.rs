//! Repository for the `weekly_records` table.

use nutriquest_core::types::DbId;
use nutriquest_core::weekly_cycle::CreateWeeklyRecord;
use sqlx::PgPool;

use crate::models::weekly_record::WeeklyRecordRow;

const COLUMNS: &str =
    "id, user_id, week_start, week_end, final_health, xp_forfeited, failed, created_at";

pub struct WeeklyRecordRepo;

impl WeeklyRecordRepo {
    /// Insert a record for a closed week, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWeeklyRecord,
    ) -> Result<WeeklyRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO weekly_records (user_id, week_start, week_end, final_health, xp_forfeited, failed)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyRecordRow>(&query)
            .bind(input.user_id)
            .bind(input.week_start)
            .bind(input.week_end)
            .bind(input.final_health)
            .bind(input.xp_forfeited)
            .bind(input.failed)
            .fetch_one(pool)
            .await
    }

    /// Most recent weeks first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<WeeklyRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weekly_records
             WHERE user_id = $1
             ORDER BY week_start DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, WeeklyRecordRow>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
