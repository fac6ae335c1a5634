//! Daily quest row model.

use nutriquest_core::quest::Quest;
use nutriquest_core::types::{DbId, GameDate, Timestamp};
use sqlx::FromRow;

/// A row from the `daily_quests` table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestRow {
    pub id: DbId,
    pub user_id: DbId,
    pub quest_date: GameDate,
    pub quest_type: String,
    pub description: String,
    pub xp_reward: i32,
    pub completed: bool,
    pub created_at: Timestamp,
}

impl From<QuestRow> for Quest {
    fn from(row: QuestRow) -> Self {
        Quest {
            id: row.id,
            user_id: row.user_id,
            quest_date: row.quest_date,
            quest_type: row.quest_type,
            description: row.description,
            xp_reward: row.xp_reward,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}
