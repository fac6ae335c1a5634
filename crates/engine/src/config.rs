use chrono::{FixedOffset, Offset, Utc};
use nutriquest_core::types::{GameDate, Timestamp};

/// Default number of weekly records returned by the history operation.
pub const DEFAULT_HISTORY_LIMIT: i64 = 12;

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Offset from UTC, in minutes, of the calendar used for quest dates.
    pub utc_offset_minutes: i32,
    /// Maximum number of weekly records returned by `weekly_history`.
    pub history_limit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `GAME_UTC_OFFSET_MINUTES` | `0`     |
    /// | `GAME_HISTORY_LIMIT`      | `12`    |
    pub fn from_env() -> Self {
        let utc_offset_minutes: i32 = std::env::var("GAME_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("GAME_UTC_OFFSET_MINUTES must be a valid i32");
        assert!(
            (-14 * 60..=14 * 60).contains(&utc_offset_minutes),
            "GAME_UTC_OFFSET_MINUTES must be within +/- 14 hours"
        );

        let history_limit: i64 = std::env::var("GAME_HISTORY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_HISTORY_LIMIT.to_string())
            .parse()
            .expect("GAME_HISTORY_LIMIT must be a valid i64");

        Self {
            utc_offset_minutes,
            history_limit: history_limit.max(1),
        }
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// The player's calendar day at instant `now`.
    pub fn game_date(&self, now: Timestamp) -> GameDate {
        now.with_timezone(&self.offset()).date_naive()
    }
}
