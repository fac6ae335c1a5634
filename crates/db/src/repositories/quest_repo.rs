//! Repository for the `daily_quests` table.

use nutriquest_core::quest::QuestSpec;
use nutriquest_core::types::{DbId, GameDate};
use sqlx::PgPool;

use crate::models::quest::QuestRow;

const COLUMNS: &str =
    "id, user_id, quest_date, quest_type, description, xp_reward, completed, created_at";

/// Daily quest persistence. Quests are never deleted.
pub struct QuestRepo;

impl QuestRepo {
    /// All quests for a user on `date`, in creation order.
    pub async fn list_for_day(
        pool: &PgPool,
        user_id: DbId,
        date: GameDate,
    ) -> Result<Vec<QuestRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_quests
             WHERE user_id = $1 AND quest_date = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, QuestRow>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Distinct quest dates for a user strictly between `after` (if given)
    /// and `before`, oldest first.
    pub async fn list_dates(
        pool: &PgPool,
        user_id: DbId,
        after: Option<GameDate>,
        before: GameDate,
    ) -> Result<Vec<GameDate>, sqlx::Error> {
        sqlx::query_scalar::<_, GameDate>(
            "SELECT DISTINCT quest_date FROM daily_quests
             WHERE user_id = $1
               AND quest_date < $3
               AND ($2::DATE IS NULL OR quest_date > $2)
             ORDER BY quest_date ASC",
        )
        .bind(user_id)
        .bind(after)
        .bind(before)
        .fetch_all(pool)
        .await
    }

    /// Insert a day's quest set within a transaction.
    ///
    /// Rows that collide on `(user_id, quest_date, quest_type)` are skipped,
    /// so two racing generators cannot produce a duplicate set. Returns the
    /// full set for the day after the insert.
    pub async fn create_for_day(
        pool: &PgPool,
        user_id: DbId,
        date: GameDate,
        specs: &[QuestSpec],
    ) -> Result<Vec<QuestRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for spec in specs {
            sqlx::query(
                "INSERT INTO daily_quests (user_id, quest_date, quest_type, description, xp_reward)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT ON CONSTRAINT uq_daily_quests_user_date_type DO NOTHING",
            )
            .bind(user_id)
            .bind(date)
            .bind(spec.quest_type.as_str())
            .bind(&spec.description)
            .bind(spec.xp_reward)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM daily_quests
             WHERE user_id = $1 AND quest_date = $2
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, QuestRow>(&query)
            .bind(user_id)
            .bind(date)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rows)
    }

    /// Set the completion flag of a quest. Returns `None` if it does not exist.
    pub async fn set_completed(
        pool: &PgPool,
        id: DbId,
        completed: bool,
    ) -> Result<Option<QuestRow>, sqlx::Error> {
        let query = format!(
            "UPDATE daily_quests SET completed = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestRow>(&query)
            .bind(id)
            .bind(completed)
            .fetch_optional(pool)
            .await
    }
}
