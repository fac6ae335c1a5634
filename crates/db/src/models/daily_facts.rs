//! Aggregate rows read from the food/water logs and the users table.

use nutriquest_core::facts::{DailyNutrition, MealType, UserGoals};
use sqlx::FromRow;

/// One-row aggregate over a user's food logs for a day.
#[derive(Debug, Clone, FromRow)]
pub struct NutritionTotalsRow {
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub has_fruit_or_veg: bool,
    pub meal_types: Vec<String>,
}

impl From<NutritionTotalsRow> for DailyNutrition {
    /// Unknown meal tags are dropped.
    fn from(row: NutritionTotalsRow) -> Self {
        DailyNutrition {
            calories: row.calories,
            protein: row.protein,
            fiber: row.fiber,
            sodium: row.sodium,
            has_fruit_or_veg: row.has_fruit_or_veg,
            meal_types: row
                .meal_types
                .iter()
                .filter_map(|t| MealType::parse(t))
                .collect(),
        }
    }
}

/// Goal columns from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserGoalsRow {
    pub daily_calories: Option<i32>,
    pub daily_protein: Option<i32>,
    pub water_goal_oz: Option<i32>,
}

impl From<UserGoalsRow> for UserGoals {
    fn from(row: UserGoalsRow) -> Self {
        UserGoals {
            daily_calories: row.daily_calories,
            daily_protein: row.daily_protein,
            water_goal_oz: row.water_goal_oz,
        }
    }
}
