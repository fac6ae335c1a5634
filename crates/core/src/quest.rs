//! Daily quest records and the fixed set of quest types.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, GameDate, Timestamp};

/// Every quest type the catalog knows about. Stored as its snake_case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    LogBreakfast,
    LogLunch,
    LogDinner,
    CalorieTarget,
    ProteinTarget,
    FruitVeg,
    Fiber,
    Sodium,
    WaterGoal,
}

impl QuestType {
    pub const ALL: [QuestType; 9] = [
        QuestType::LogBreakfast,
        QuestType::LogLunch,
        QuestType::LogDinner,
        QuestType::CalorieTarget,
        QuestType::ProteinTarget,
        QuestType::FruitVeg,
        QuestType::Fiber,
        QuestType::Sodium,
        QuestType::WaterGoal,
    ];

    /// The tag persisted in the `quest_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestType::LogBreakfast => "log_breakfast",
            QuestType::LogLunch => "log_lunch",
            QuestType::LogDinner => "log_dinner",
            QuestType::CalorieTarget => "calorie_target",
            QuestType::ProteinTarget => "protein_target",
            QuestType::FruitVeg => "fruit_veg",
            QuestType::Fiber => "fiber",
            QuestType::Sodium => "sodium",
            QuestType::WaterGoal => "water_goal",
        }
    }

    /// Parse a stored tag. Returns `None` for tags this build does not know.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl std::fmt::Display for QuestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted quest for one user and one calendar day.
///
/// `quest_type` is kept as the raw tag so that rows written by a newer or
/// older catalog still load; [`Quest::kind`] resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: DbId,
    pub user_id: DbId,
    pub quest_date: GameDate,
    pub quest_type: String,
    pub description: String,
    pub xp_reward: i32,
    pub completed: bool,
    pub created_at: Timestamp,
}

impl Quest {
    pub fn kind(&self) -> Option<QuestType> {
        QuestType::parse(&self.quest_type)
    }
}

/// A quest to be created by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestSpec {
    pub quest_type: QuestType,
    pub description: String,
    pub xp_reward: i32,
}
