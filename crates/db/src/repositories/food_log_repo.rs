//! Read-only aggregates over the `food_logs` table.

use nutriquest_core::types::{DbId, GameDate};
use sqlx::PgPool;

use crate::models::daily_facts::NutritionTotalsRow;

pub struct FoodLogRepo;

impl FoodLogRepo {
    /// Sum a user's food logs for `date`. Always returns one row; a day
    /// with no logs yields zeros, `false` and an empty meal list.
    pub async fn daily_totals(
        pool: &PgPool,
        user_id: DbId,
        date: GameDate,
    ) -> Result<NutritionTotalsRow, sqlx::Error> {
        sqlx::query_as::<_, NutritionTotalsRow>(
            "SELECT
                COALESCE(SUM(calories), 0)::DOUBLE PRECISION AS calories,
                COALESCE(SUM(protein), 0)::DOUBLE PRECISION AS protein,
                COALESCE(SUM(fiber), 0)::DOUBLE PRECISION AS fiber,
                COALESCE(SUM(sodium), 0)::DOUBLE PRECISION AS sodium,
                COALESCE(BOOL_OR(is_fruit OR is_vegetable), FALSE) AS has_fruit_or_veg,
                COALESCE(ARRAY_AGG(DISTINCT meal_type), ARRAY[]::TEXT[]) AS meal_types
             FROM food_logs
             WHERE user_id = $1 AND log_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(pool)
        .await
    }
}
