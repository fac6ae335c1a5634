//! Combat resolution: quest completions damage the dungeon enemy.
//!
//! One damage point is dealt per quest that became complete in the current
//! evaluation pass, never per quest that is complete overall, so repeated
//! evaluations cannot re-damage the enemy or re-award XP.

use serde::Serialize;

use crate::character::{apply_xp, Character, CharacterUpdate};
use crate::quest_catalog::{enemy_hp_for_tier, tier_for_level, QUEST_XP_REWARD};
use crate::quest_evaluation::EvaluationSummary;

/// Bonus XP per dungeon tier for defeating the enemy.
pub const DEFEAT_XP_PER_TIER: i32 = 50;

/// Coins per dungeon tier for defeating the enemy.
pub const DEFEAT_COINS_PER_TIER: i32 = 20;

/// What a combat pass produced, as reported to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatOutcome {
    pub enemy_defeated: bool,
    pub xp_gained: i32,
    pub coins_gained: i32,
    pub leveled_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<i32>,
}

/// A combat outcome plus the character write that realises it.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatResolution {
    pub outcome: CombatOutcome,
    pub damage: i32,
    pub update: CharacterUpdate,
}

/// Resolve combat for `character` after an evaluation pass.
///
/// - damage is `today.newly_completed`; enemy HP is floored at 0
/// - the enemy is defeated only when its HP is 0 *and* every one of today's
///   quests is complete
/// - on defeat the tier is recomputed from the post-levelling level and the
///   enemy is respawned at that tier's HP
pub fn resolve_combat(character: &Character, today: &EvaluationSummary) -> CombatResolution {
    let damage = i32::try_from(today.newly_completed).unwrap_or(i32::MAX);
    let enemy_hp = character.enemy_hp.saturating_sub(damage).max(0);
    let enemy_defeated = enemy_hp == 0 && today.all_complete();

    let mut xp_gained = damage.saturating_mul(QUEST_XP_REWARD);
    let mut coins_gained = 0;
    if enemy_defeated {
        xp_gained += DEFEAT_XP_PER_TIER * character.dungeon_tier;
        coins_gained = DEFEAT_COINS_PER_TIER * character.dungeon_tier;
    }

    let progress = apply_xp(character.level, character.xp, xp_gained);

    let mut update = CharacterUpdate {
        level: Some(progress.level),
        xp: Some(progress.xp),
        xp_to_next: Some(progress.xp_to_next),
        coins: Some(character.coins + coins_gained),
        enemy_hp: Some(enemy_hp),
        dungeon_tier: Some(character.dungeon_tier),
        ..Default::default()
    };

    if enemy_defeated {
        let tier = tier_for_level(progress.level);
        let respawn_hp = enemy_hp_for_tier(tier);
        update.dungeon_tier = Some(tier);
        update.enemy_hp = Some(respawn_hp);
        update.enemy_max_hp = Some(respawn_hp);
    }

    CombatResolution {
        outcome: CombatOutcome {
            enemy_defeated,
            xp_gained,
            coins_gained,
            leveled_up: progress.leveled_up(),
            new_level: progress.leveled_up().then_some(progress.level),
        },
        damage,
        update,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
