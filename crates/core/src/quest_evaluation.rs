//! Quest completion rules and reconciliation against stored quests.
//!
//! [`compute_completion`] is the pure decision for one quest type.
//! [`reconcile`] runs it over a day's stored quests and works out which of
//! them flip from incomplete to complete. Completion is monotonic within a
//! day: a quest already stored as complete stays complete even if the
//! recomputed answer is `false`.

use serde::Serialize;

use crate::facts::{DailyFacts, MealType};
use crate::quest::{Quest, QuestType};
use crate::types::DbId;

/// Minimum fiber (grams) for the fiber quest.
pub const FIBER_TARGET_G: f64 = 25.0;

/// Maximum sodium (milligrams) for the sodium quest.
pub const SODIUM_LIMIT_MG: f64 = 2300.0;

/// Calorie ceiling as a multiple of the daily goal.
pub const CALORIE_TOLERANCE: f64 = 1.1;

/// Whether `quest_type` is satisfied by `facts`.
///
/// The calorie and sodium quests both require that something was eaten: a
/// day with zero logged calories fails them.
pub fn compute_completion(quest_type: QuestType, facts: &DailyFacts) -> bool {
    let n = &facts.nutrition;
    match quest_type {
        QuestType::LogBreakfast => n.meal_types.contains(&MealType::Breakfast),
        QuestType::LogLunch => n.meal_types.contains(&MealType::Lunch),
        QuestType::LogDinner => n.meal_types.contains(&MealType::Dinner),
        QuestType::CalorieTarget => {
            n.calories > 0.0 && n.calories <= f64::from(facts.calorie_goal) * CALORIE_TOLERANCE
        }
        QuestType::ProteinTarget => n.protein >= f64::from(facts.protein_goal),
        QuestType::FruitVeg => n.has_fruit_or_veg,
        QuestType::Fiber => n.fiber >= FIBER_TARGET_G,
        QuestType::Sodium => n.calories > 0.0 && n.sodium <= SODIUM_LIMIT_MG,
        QuestType::WaterGoal => facts.hydration_glasses >= facts.water_goal_glasses,
    }
}

/// Counts reported by one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub completed: usize,
    pub total: usize,
    pub newly_completed: usize,
}

impl EvaluationSummary {
    pub fn all_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Outcome of reconciling stored quests with freshly computed completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Quests that must be persisted as completed (false -> true flips).
    pub newly_completed: Vec<DbId>,
    /// Quests whose stored type tag is not in the catalog, with the tag.
    pub unrecognized: Vec<(DbId, String)>,
    pub summary: EvaluationSummary,
}

/// Recompute completion for `quests` and diff it against stored state.
///
/// Unrecognized quest types count as not completed and never fail the batch.
pub fn reconcile(quests: &[Quest], facts: &DailyFacts) -> Reconciliation {
    let mut out = Reconciliation::default();

    for quest in quests {
        let now_complete = match quest.kind() {
            Some(kind) => compute_completion(kind, facts),
            None => {
                out.unrecognized.push((quest.id, quest.quest_type.clone()));
                false
            }
        };

        if quest.completed {
            out.summary.completed += 1;
        } else if now_complete {
            out.newly_completed.push(quest.id);
            out.summary.completed += 1;
        }
    }

    out.summary.total = quests.len();
    out.summary.newly_completed = out.newly_completed.len();
    out
}

/// Counts for a set of quests without recomputing anything.
pub fn stored_summary(quests: &[Quest]) -> EvaluationSummary {
    EvaluationSummary {
        completed: quests.iter().filter(|q| q.completed).count(),
        total: quests.len(),
        newly_completed: 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
