//! Weekly record row model.

use nutriquest_core::types::{DbId, Timestamp};
use nutriquest_core::weekly_cycle::WeeklyRecord;
use sqlx::FromRow;

/// A row from the `weekly_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyRecordRow {
    pub id: DbId,
    pub user_id: DbId,
    pub week_start: Timestamp,
    pub week_end: Timestamp,
    pub final_health: i32,
    pub xp_forfeited: i32,
    pub failed: bool,
    pub created_at: Timestamp,
}

impl From<WeeklyRecordRow> for WeeklyRecord {
    fn from(row: WeeklyRecordRow) -> Self {
        WeeklyRecord {
            id: row.id,
            user_id: row.user_id,
            week_start: row.week_start,
            week_end: row.week_end,
            final_health: row.final_health,
            xp_forfeited: row.xp_forfeited,
            failed: row.failed,
            created_at: row.created_at,
        }
    }
}
