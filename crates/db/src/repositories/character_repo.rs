//! Repository for the `characters` table.

use nutriquest_core::character::CharacterUpdate;
use nutriquest_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::character::CharacterRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, level, xp, xp_to_next, health, max_health, coins, \
     dungeon_tier, enemy_hp, enemy_max_hp, thirst_meter, week_start_date, last_closed_date, created_at, updated_at";

/// Reads and partial updates of the per-user character.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Find the character owned by `user_id`.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE user_id = $1");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a character. Only non-`None` fields in `input` are applied, in
    /// a single statement.
    ///
    /// Returns `None` if the user has no character.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &CharacterUpdate,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::update_inner(&mut conn, user_id, input).await
    }

    /// Mark `quest_ids` complete and update the character in one
    /// transaction. Nothing is committed if the user has no character.
    pub async fn apply_evaluation(
        pool: &PgPool,
        user_id: DbId,
        quest_ids: &[DbId],
        input: &CharacterUpdate,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !quest_ids.is_empty() {
            sqlx::query(
                "UPDATE daily_quests SET completed = TRUE
                 WHERE user_id = $1 AND id = ANY($2)",
            )
            .bind(user_id)
            .bind(quest_ids)
            .execute(&mut *tx)
            .await?;
        }

        let Some(row) = Self::update_inner(&mut tx, user_id, input).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some(row))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn update_inner(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &CharacterUpdate,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                level = COALESCE($2, level),
                xp = COALESCE($3, xp),
                xp_to_next = COALESCE($4, xp_to_next),
                health = COALESCE($5, health),
                coins = COALESCE($6, coins),
                dungeon_tier = COALESCE($7, dungeon_tier),
                enemy_hp = COALESCE($8, enemy_hp),
                enemy_max_hp = COALESCE($9, enemy_max_hp),
                thirst_meter = COALESCE($10, thirst_meter),
                week_start_date = COALESCE($11, week_start_date),
                last_closed_date = GREATEST($12, last_closed_date),
                updated_at = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(user_id)
            .bind(input.level)
            .bind(input.xp)
            .bind(input.xp_to_next)
            .bind(input.health)
            .bind(input.coins)
            .bind(input.dungeon_tier)
            .bind(input.enemy_hp)
            .bind(input.enemy_max_hp)
            .bind(input.thirst_meter)
            .bind(input.week_start_date)
            .bind(input.last_closed_date)
            .fetch_optional(&mut *conn)
            .await
    }
}
