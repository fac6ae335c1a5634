//! The player's RPG character and the XP/levelling rules that apply to it.
//!
//! One character exists per user. Every progression operation reads it,
//! computes a [`CharacterUpdate`], and writes that update back in a single
//! partial update.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, GameDate, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Health a freshly registered character starts with (and is restored to
/// on every weekly rollover unless the user's `max_health` says otherwise).
pub const DEFAULT_MAX_HEALTH: i32 = 7;

/// XP needed per level: reaching level `n + 1` from level `n` costs `n * 100`.
pub const XP_PER_LEVEL: i32 = 100;

/// Upper bound of the thirst meter (maximally dehydrated).
pub const MAX_THIRST: i32 = 7;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A character row. Field invariants:
///
/// - `level >= 1`, `xp >= 0`, `xp_to_next == level * XP_PER_LEVEL`
/// - `0 <= health <= max_health`
/// - `dungeon_tier` in `1..=3`
/// - `0 <= enemy_hp <= enemy_max_hp`
/// - `0 <= thirst_meter <= MAX_THIRST`
/// - `last_closed_date` only moves forward; every quest day up to and
///   including it has had its end-of-day penalty applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
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

/// Partial update for a character. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterUpdate {
    pub level: Option<i32>,
    pub xp: Option<i32>,
    pub xp_to_next: Option<i32>,
    pub health: Option<i32>,
    pub coins: Option<i32>,
    pub dungeon_tier: Option<i32>,
    pub enemy_hp: Option<i32>,
    pub enemy_max_hp: Option<i32>,
    pub thirst_meter: Option<i32>,
    pub week_start_date: Option<Timestamp>,
    pub last_closed_date: Option<GameDate>,
}

impl CharacterUpdate {
    /// `true` when the update would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(mut self, other: CharacterUpdate) -> Self {
        self.level = other.level.or(self.level);
        self.xp = other.xp.or(self.xp);
        self.xp_to_next = other.xp_to_next.or(self.xp_to_next);
        self.health = other.health.or(self.health);
        self.coins = other.coins.or(self.coins);
        self.dungeon_tier = other.dungeon_tier.or(self.dungeon_tier);
        self.enemy_hp = other.enemy_hp.or(self.enemy_hp);
        self.enemy_max_hp = other.enemy_max_hp.or(self.enemy_max_hp);
        self.thirst_meter = other.thirst_meter.or(self.thirst_meter);
        self.week_start_date = other.week_start_date.or(self.week_start_date);
        self.last_closed_date = other.last_closed_date.or(self.last_closed_date);
        self
    }

    /// Apply the update to an in-memory character.
    pub fn apply_to(&self, character: &mut Character) {
        if let Some(v) = self.level {
            character.level = v;
        }
        if let Some(v) = self.xp {
            character.xp = v;
        }
        if let Some(v) = self.xp_to_next {
            character.xp_to_next = v;
        }
        if let Some(v) = self.health {
            character.health = v;
        }
        if let Some(v) = self.coins {
            character.coins = v;
        }
        if let Some(v) = self.dungeon_tier {
            character.dungeon_tier = v;
        }
        if let Some(v) = self.enemy_hp {
            character.enemy_hp = v;
        }
        if let Some(v) = self.enemy_max_hp {
            character.enemy_max_hp = v;
        }
        if let Some(v) = self.thirst_meter {
            character.thirst_meter = v;
        }
        if let Some(v) = self.week_start_date {
            character.week_start_date = v;
        }
        if let Some(v) = self.last_closed_date {
            character.last_closed_date = Some(v);
        }
    }
}

// ---------------------------------------------------------------------------
// Levelling
// ---------------------------------------------------------------------------

/// XP required to leave `level`.
pub fn xp_to_next_for(level: i32) -> i32 {
    level * XP_PER_LEVEL
}

/// Result of pushing XP through the levelling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: i32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub levels_gained: i32,
}

impl LevelProgress {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Add `gained` XP to a character at `level` holding `xp` and run the
/// levelling loop.
///
/// While `xp >= xp_to_next` the threshold is subtracted, the level is
/// incremented and the threshold is recomputed for the new level, so a
/// single grant can jump several levels. The threshold is always derived
/// from the level, which restores the `xp_to_next == level * 100`
/// invariant even if the stored value had drifted.
pub fn apply_xp(level: i32, xp: i32, gained: i32) -> LevelProgress {
    let start_level = level.max(1);
    let mut level = start_level;
    let mut xp = (xp + gained.max(0)).max(0);
    let mut xp_to_next = xp_to_next_for(level);

    while xp >= xp_to_next {
        xp -= xp_to_next;
        level += 1;
        xp_to_next = xp_to_next_for(level);
    }

    LevelProgress {
        level,
        xp,
        xp_to_next,
        levels_gained: level - start_level,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
