//! Static quest definitions and the tier configuration.

use crate::quest::{QuestSpec, QuestType};

/// XP granted by every quest.
pub const QUEST_XP_REWARD: i32 = 25;

/// Quest count used when a tier is missing from [`TIER_QUEST_COUNTS`].
pub const FALLBACK_QUEST_COUNT: usize = 5;

/// Required daily quest count per dungeon tier. The enemy's max HP for a
/// tier always equals this count.
pub const TIER_QUEST_COUNTS: [(i32, usize); 3] = [(1, 5), (2, 6), (3, 7)];

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestDefinition {
    pub quest_type: QuestType,
    pub description: &'static str,
}

impl QuestDefinition {
    pub fn to_spec(self) -> QuestSpec {
        QuestSpec {
            quest_type: self.quest_type,
            description: self.description.to_string(),
            xp_reward: QUEST_XP_REWARD,
        }
    }
}

/// Meal-logging quests included in every day's set.
pub const CORE_QUESTS: [QuestDefinition; 3] = [
    QuestDefinition {
        quest_type: QuestType::LogBreakfast,
        description: "Log your breakfast",
    },
    QuestDefinition {
        quest_type: QuestType::LogLunch,
        description: "Log your lunch",
    },
    QuestDefinition {
        quest_type: QuestType::LogDinner,
        description: "Log your dinner",
    },
];

/// Quests sampled to fill the rest of the day's set.
pub const EXTRA_QUESTS: [QuestDefinition; 6] = [
    QuestDefinition {
        quest_type: QuestType::CalorieTarget,
        description: "Stay within calorie target",
    },
    QuestDefinition {
        quest_type: QuestType::ProteinTarget,
        description: "Hit your protein goal",
    },
    QuestDefinition {
        quest_type: QuestType::FruitVeg,
        description: "Eat a fruit or vegetable",
    },
    QuestDefinition {
        quest_type: QuestType::Fiber,
        description: "Get 25g+ fiber today",
    },
    QuestDefinition {
        quest_type: QuestType::Sodium,
        description: "Keep sodium under 2300mg",
    },
    QuestDefinition {
        quest_type: QuestType::WaterGoal,
        description: "Drink your water goal",
    },
];

/// Daily quest count for `tier`, falling back to [`FALLBACK_QUEST_COUNT`].
pub fn quest_count_for_tier(tier: i32) -> usize {
    TIER_QUEST_COUNTS
        .iter()
        .find(|(t, _)| *t == tier)
        .map(|(_, count)| *count)
        .unwrap_or(FALLBACK_QUEST_COUNT)
}

/// Enemy max HP for `tier` (same as its quest count).
pub fn enemy_hp_for_tier(tier: i32) -> i32 {
    quest_count_for_tier(tier) as i32
}

/// Dungeon tier implied by a character level: 15+ is tier 3, 7+ tier 2.
pub fn tier_for_level(level: i32) -> i32 {
    if level >= 15 {
        3
    } else if level >= 7 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tiers_map_to_counts() {
        assert_eq!(quest_count_for_tier(1), 5);
        assert_eq!(quest_count_for_tier(2), 6);
        assert_eq!(quest_count_for_tier(3), 7);
    }

    #[test]
    fn unknown_tier_falls_back_to_five() {
        assert_eq!(quest_count_for_tier(0), 5);
        assert_eq!(quest_count_for_tier(9), 5);
        assert_eq!(enemy_hp_for_tier(-1), 5);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for_level(1), 1);
        assert_eq!(tier_for_level(6), 1);
        assert_eq!(tier_for_level(7), 2);
        assert_eq!(tier_for_level(14), 2);
        assert_eq!(tier_for_level(15), 3);
        assert_eq!(tier_for_level(40), 3);
    }

    #[test]
    fn catalog_covers_every_type_once() {
        let mut types: Vec<QuestType> = CORE_QUESTS
            .iter()
            .chain(EXTRA_QUESTS.iter())
            .map(|d| d.quest_type)
            .collect();
        types.sort();
        types.dedup();
        assert_eq!(types.len(), QuestType::ALL.len());
    }
}
