//! Read access to the goal columns of the `users` table.

use nutriquest_core::types::DbId;
use sqlx::PgPool;

use crate::models::daily_facts::UserGoalsRow;

pub struct UserRepo;

impl UserRepo {
    /// Goals for a user. Returns `None` if the user does not exist.
    pub async fn find_goals(pool: &PgPool, user_id: DbId) -> Result<Option<UserGoalsRow>, sqlx::Error> {
        sqlx::query_as::<_, UserGoalsRow>(
            "SELECT daily_calories, daily_protein, water_goal_oz FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
