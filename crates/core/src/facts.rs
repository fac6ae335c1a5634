//! Daily nutrition/hydration facts and the user goals they are judged against.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Calorie goal used when the user has none configured.
pub const DEFAULT_DAILY_CALORIES: i32 = 2000;

/// Protein goal (grams) used when the user has none configured.
pub const DEFAULT_DAILY_PROTEIN: i32 = 100;

/// Water goal (fluid ounces) used when the user has none configured.
pub const DEFAULT_WATER_GOAL_OZ: i32 = 64;

/// Ounces per logged glass of water.
pub const OZ_PER_GLASS: i32 = 8;

/// Meal slots a food log can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// Sums over a user's food logs for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutrition {
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub has_fruit_or_veg: bool,
    pub meal_types: BTreeSet<MealType>,
}

/// A user's configured targets. `None` or non-positive values fall back to
/// the `DEFAULT_*` constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGoals {
    pub daily_calories: Option<i32>,
    pub daily_protein: Option<i32>,
    pub water_goal_oz: Option<i32>,
}

fn positive_or(value: Option<i32>, default: i32) -> i32 {
    value.filter(|v| *v > 0).unwrap_or(default)
}

impl UserGoals {
    pub fn calorie_goal(&self) -> i32 {
        positive_or(self.daily_calories, DEFAULT_DAILY_CALORIES)
    }

    pub fn protein_goal(&self) -> i32 {
        positive_or(self.daily_protein, DEFAULT_DAILY_PROTEIN)
    }

    pub fn water_goal_oz(&self) -> i32 {
        positive_or(self.water_goal_oz, DEFAULT_WATER_GOAL_OZ)
    }

    /// Glasses needed to meet the water goal, rounded up. Always at least 1.
    pub fn water_goal_glasses(&self) -> i32 {
        let oz = self.water_goal_oz();
        (oz + OZ_PER_GLASS - 1) / OZ_PER_GLASS
    }
}

/// Everything quest evaluation needs to know about one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyFacts {
    pub nutrition: DailyNutrition,
    pub hydration_glasses: i32,
    pub calorie_goal: i32,
    pub protein_goal: i32,
    pub water_goal_glasses: i32,
}

impl DailyFacts {
    pub fn new(nutrition: DailyNutrition, hydration_glasses: i32, goals: &UserGoals) -> Self {
        Self {
            nutrition,
            hydration_glasses,
            calorie_goal: goals.calorie_goal(),
            protein_goal: goals.protein_goal(),
            water_goal_glasses: goals.water_goal_glasses(),
        }
    }
}
