//! Results returned by the client-facing engine operations.

use nutriquest_core::character::Character;
use nutriquest_core::combat::CombatOutcome;
use nutriquest_core::quest::Quest;
use nutriquest_core::quest_evaluation::EvaluationSummary;
use nutriquest_core::types::GameDate;
use nutriquest_core::weekly_cycle::EndOfDayOutcome;
use serde::Serialize;

/// Character plus today's quests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub character: Character,
    pub quests: Vec<Quest>,
}

/// Everything produced by one evaluate call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationView {
    pub character: Character,
    pub quests: Vec<Quest>,
    pub evaluation: EvaluationSummary,
    pub combat: CombatOutcome,
    pub thirst_meter: i32,
}

/// Result of closing out a day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDayView {
    pub date: GameDate,
    #[serde(flatten)]
    pub outcome: EndOfDayOutcome,
    pub combat: CombatOutcome,
    /// The day had been closed before this call; nothing was written.
    pub already_closed: bool,
}
