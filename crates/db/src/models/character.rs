//! Character row model.

use nutriquest_core::character::Character;
use nutriquest_core::types::{DbId, GameDate, Timestamp};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRow {
    pub id: DbId,
    pub user_id: DbId,
    pub level: i32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub health: i32,
    pub max_health: i32,
    pub coins: i32,
    pub dungeon_tier: i32,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub thirst_meter: i32,
    pub week_start_date: Timestamp,
    pub last_closed_date: Option<GameDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Character {
            id: row.id,
            user_id: row.user_id,
            level: row.level,
            xp: row.xp,
            xp_to_next: row.xp_to_next,
            health: row.health,
            max_health: row.max_health,
            coins: row.coins,
            dungeon_tier: row.dungeon_tier,
            enemy_hp: row.enemy_hp,
            enemy_max_hp: row.enemy_max_hp,
            thirst_meter: row.thirst_meter,
            week_start_date: row.week_start_date,
            last_closed_date: row.last_closed_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
