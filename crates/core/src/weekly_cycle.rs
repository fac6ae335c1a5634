//! Weekly rollover and the end-of-day health penalty.
//!
//! Health only ever comes back at the weekly rollover. A week that ends
//! with the character at 0 health is a failed week and forfeits the XP
//! progress held at that moment; level, tier and coins are kept.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::character::{Character, CharacterUpdate};
use crate::quest_evaluation::EvaluationSummary;
use crate::types::{DbId, GameDate, Timestamp};

/// Length of a progression cycle.
pub const WEEK_LENGTH_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Weekly records
// ---------------------------------------------------------------------------

/// History entry written for every closed week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub week_start: Timestamp,
    pub week_end: Timestamp,
    pub final_health: i32,
    pub xp_forfeited: i32,
    pub failed: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a weekly record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWeeklyRecord {
    pub user_id: DbId,
    pub week_start: Timestamp,
    pub week_end: Timestamp,
    pub final_health: i32,
    pub xp_forfeited: i32,
    pub failed: bool,
}

// ---------------------------------------------------------------------------
// Rollover
// ---------------------------------------------------------------------------

/// A due rollover: the character write plus the record of the closed week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRollover {
    pub failed_week: bool,
    pub update: CharacterUpdate,
    pub record: CreateWeeklyRecord,
}

/// Whole days elapsed since the character's week started (floored).
pub fn days_since_week_start(character: &Character, now: Timestamp) -> i64 {
    (now - character.week_start_date).num_days()
}

/// Compute the rollover for `character` at `now`, or `None` if fewer than
/// [`WEEK_LENGTH_DAYS`] whole days have passed.
pub fn plan_rollover(character: &Character, now: Timestamp) -> Option<WeeklyRollover> {
    if days_since_week_start(character, now) < WEEK_LENGTH_DAYS {
        return None;
    }

    let failed_week = character.health <= 0;
    let update = CharacterUpdate {
        health: Some(character.max_health),
        thirst_meter: Some(0),
        week_start_date: Some(now),
        xp: failed_week.then_some(0),
        ..Default::default()
    };

    let record = CreateWeeklyRecord {
        user_id: character.user_id,
        week_start: character.week_start_date,
        week_end: character.week_start_date + Duration::days(WEEK_LENGTH_DAYS - 1),
        final_health: character.health,
        xp_forfeited: if failed_week { character.xp } else { 0 },
        failed: failed_week,
    };

    Some(WeeklyRollover {
        failed_week,
        update,
        record,
    })
}

// ---------------------------------------------------------------------------
// End of day
// ---------------------------------------------------------------------------

/// Result of closing out a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDayOutcome {
    /// Fewer than half of the day's quests were completed.
    pub health_lost: bool,
    /// Health after the penalty.
    pub health: i32,
    pub completed: usize,
    pub total: usize,
}

/// Minimum completed quests to avoid the penalty: `ceil(total / 2)`.
pub fn end_of_day_threshold(total: usize) -> usize {
    total.div_ceil(2)
}

/// Apply the end-of-day rule: lose one health (floored at 0) when fewer
/// than half of the day's quests were completed.
///
/// Returns the outcome and the write to persist, if any.
pub fn end_of_day_penalty(
    character: &Character,
    day: &EvaluationSummary,
) -> (EndOfDayOutcome, Option<CharacterUpdate>) {
    let health_lost = day.completed < end_of_day_threshold(day.total);
    let health = if health_lost {
        (character.health - 1).max(0)
    } else {
        character.health
    };

    let update = (health != character.health).then(|| CharacterUpdate {
        health: Some(health),
        ..Default::default()
    });

    (
        EndOfDayOutcome {
            health_lost,
            health,
            completed: day.completed,
            total: day.total,
        },
        update,
    )
}

/// Whether the end-of-day penalty has already been applied for `date`.
pub fn is_day_closed(character: &Character, date: GameDate) -> bool {
    character
        .last_closed_date
        .is_some_and(|closed| date <= closed)
}

/// Write that records `date` as closed. The marker never moves backwards.
pub fn mark_day_closed(character: &Character, date: GameDate) -> CharacterUpdate {
    let closed = character
        .last_closed_date
        .map_or(date, |closed| closed.max(date));
    CharacterUpdate {
        last_closed_date: Some(closed),
        ..Default::default()
    }
}

/// Outcome reported for a day that was closed earlier: no penalty, the
/// current health, and the stored completion counts.
pub fn already_closed_outcome(character: &Character, day: &EvaluationSummary) -> EndOfDayOutcome {
    EndOfDayOutcome {
        health_lost: false,
        health: character.health,
        completed: day.completed,
        total: day.total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
