//! The progression engine.
//!
//! Public operations take the per-user lock and then call a `*_locked`
//! helper; helpers never lock, so composite operations (refresh, evaluate,
//! end of day) run their steps under a single acquisition.

use std::sync::Arc;

use chrono::Utc;
use nutriquest_core::character::{Character, CharacterUpdate};
use nutriquest_core::combat::{resolve_combat, CombatOutcome, CombatResolution};
use nutriquest_core::error::CoreError;
use nutriquest_core::facts::DailyFacts;
use nutriquest_core::hydration::thirst_meter;
use nutriquest_core::quest::Quest;
use nutriquest_core::quest_evaluation::{reconcile, stored_summary, EvaluationSummary};
use nutriquest_core::quest_generation::plan_daily_quests;
use nutriquest_core::store::ProgressionStore;
use nutriquest_core::types::{DbId, GameDate, Timestamp};
use nutriquest_core::weekly_cycle::{
    already_closed_outcome, end_of_day_penalty, is_day_closed, mark_day_closed, plan_rollover,
    WeeklyRecord,
};

use crate::config::EngineConfig;
use crate::locks::{UserGuard, UserLocks};
use crate::views::{EndOfDayView, EvaluationView, GameStateView};

pub type EngineResult<T> = Result<T, CoreError>;

/// Facts for one day plus whether the user's goals were found.
struct DayFacts {
    facts: DailyFacts,
    goals_known: bool,
}

/// A day's evaluation, computed but not yet persisted.
struct DayEvaluation {
    summary: EvaluationSummary,
    day: DayFacts,
    /// Quests that flip to completed once the evaluation is applied.
    newly_completed: Vec<DbId>,
}

pub struct ProgressionEngine {
    store: Arc<dyn ProgressionStore>,
    locks: UserLocks,
    config: EngineConfig,
}

impl ProgressionEngine {
    pub fn new(store: Arc<dyn ProgressionStore>, config: EngineConfig) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
            config,
        }
    }

    /// The player's calendar day at `now`.
    pub fn game_date(&self, now: Timestamp) -> GameDate {
        self.config.game_date(now)
    }

    // -----------------------------------------------------------------------
    // Client-facing operations
    // -----------------------------------------------------------------------

    /// Close out past days that still have an open quest set, roll the week
    /// over if due, make sure today's quests exist, and return the current
    /// character and quests.
    pub async fn refresh_state(&self, user_id: DbId) -> EngineResult<GameStateView> {
        self.refresh_state_at(user_id, Utc::now()).await
    }

    pub async fn refresh_state_at(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> EngineResult<GameStateView> {
        let guard = self.locks.acquire(user_id).await;
        let today = self.game_date(now);

        self.close_pending_days_locked(&guard, today).await?;
        self.rollover_locked(&guard, now).await?;
        self.ensure_quests_locked(&guard, today).await?;

        let character = self.require_character(user_id).await?;
        let quests = self.store.find_quests(user_id, today).await?;
        Ok(GameStateView { character, quests })
    }

    /// Evaluate today's quests, resolve combat and update thirst.
    pub async fn evaluate(&self, user_id: DbId) -> EngineResult<EvaluationView> {
        self.evaluate_at(user_id, Utc::now()).await
    }

    /// Quest flips, combat and thirst are persisted by one
    /// `apply_evaluation` call, so a failed write leaves nothing behind and
    /// a retry awards the same completions again.
    pub async fn evaluate_at(&self, user_id: DbId, now: Timestamp) -> EngineResult<EvaluationView> {
        let guard = self.locks.acquire(user_id).await;
        let today = self.game_date(now);

        let evaluation = self.evaluate_locked(&guard, today).await?;
        let character = self.require_character(user_id).await?;

        let combat = resolve_combat(&character, &evaluation.summary);
        let thirst = thirst_meter(
            evaluation.day.facts.hydration_glasses,
            evaluation.day.facts.water_goal_glasses,
        );

        let update = combat.update.clone().merge(CharacterUpdate {
            thirst_meter: Some(thirst),
            ..Default::default()
        });
        let character = self
            .apply_evaluation(user_id, &evaluation.newly_completed, &update)
            .await?;
        log_combat(user_id, &combat);

        let quests = self.store.find_quests(user_id, today).await?;
        Ok(EvaluationView {
            character,
            quests,
            evaluation: evaluation.summary,
            combat: combat.outcome,
            thirst_meter: thirst,
        })
    }

    /// Close out `date`, which must be before today's game date.
    pub async fn process_end_of_day(
        &self,
        user_id: DbId,
        date: GameDate,
    ) -> EngineResult<EndOfDayView> {
        self.process_end_of_day_at(user_id, date, Utc::now()).await
    }

    /// Close out `date`: evaluate its quests, reward anything that only now
    /// became complete, then apply the health penalty if fewer than half
    /// of the quests were done.
    ///
    /// Each day is closed at most once. Earlier days that still have an
    /// open quest set are closed first, oldest first. Closing a day that is
    /// already closed changes nothing and reports `health_lost = false`.
    pub async fn process_end_of_day_at(
        &self,
        user_id: DbId,
        date: GameDate,
        now: Timestamp,
    ) -> EngineResult<EndOfDayView> {
        let today = self.game_date(now);
        if date >= today {
            return Err(CoreError::Validation(format!(
                "End of day can only be processed for a past date, got {date} (today is {today})"
            )));
        }

        let guard = self.locks.acquire(user_id).await;
        let character = self.require_character(user_id).await?;

        if is_day_closed(&character, date) {
            let quests = self.store.find_quests(user_id, date).await?;
            tracing::debug!(user_id, %date, "Day already closed");
            return Ok(EndOfDayView {
                date,
                outcome: already_closed_outcome(&character, &stored_summary(&quests)),
                combat: CombatOutcome::default(),
                already_closed: true,
            });
        }

        self.close_pending_days_locked(&guard, date).await?;
        self.close_day_locked(&guard, date).await
    }

    /// The most recent weekly records, newest first.
    pub async fn weekly_history(&self, user_id: DbId) -> EngineResult<Vec<WeeklyRecord>> {
        Ok(self
            .store
            .list_weekly_records(user_id, self.config.history_limit)
            .await?)
    }

    // -----------------------------------------------------------------------
    // Component operations
    // -----------------------------------------------------------------------

    /// Generate today's quests unless they already exist. A user without a
    /// character gets no quests.
    pub async fn ensure_today_quests(
        &self,
        user_id: DbId,
        today: GameDate,
    ) -> EngineResult<Vec<Quest>> {
        let guard = self.locks.acquire(user_id).await;
        self.ensure_quests_locked(&guard, today).await
    }

    /// Re-evaluate quest completion for `today` and persist new completions.
    pub async fn evaluate_quests(
        &self,
        user_id: DbId,
        today: GameDate,
    ) -> EngineResult<EvaluationSummary> {
        let guard = self.locks.acquire(user_id).await;
        let evaluation = self.evaluate_locked(&guard, today).await?;
        if !evaluation.newly_completed.is_empty() {
            self.apply_evaluation(
                user_id,
                &evaluation.newly_completed,
                &CharacterUpdate::default(),
            )
            .await?;
        }
        Ok(evaluation.summary)
    }

    /// Deal `newly_completed` damage and apply rewards against the quest
    /// state stored for `today`.
    pub async fn resolve_combat(
        &self,
        user_id: DbId,
        today: GameDate,
        newly_completed: usize,
    ) -> EngineResult<CombatOutcome> {
        let _guard = self.locks.acquire(user_id).await;
        let character = self.require_character(user_id).await?;
        let quests = self.store.find_quests(user_id, today).await?;

        let summary = EvaluationSummary {
            newly_completed,
            ..stored_summary(&quests)
        };
        let resolution = resolve_combat(&character, &summary);
        self.write_character(user_id, &resolution.update).await?;
        log_combat(user_id, &resolution);
        Ok(resolution.outcome)
    }

    /// Recompute and persist the thirst meter from `today`'s hydration.
    pub async fn update_thirst(&self, user_id: DbId, today: GameDate) -> EngineResult<i32> {
        let _guard = self.locks.acquire(user_id).await;
        let glasses = self.store.sum_daily_hydration(user_id, today).await?;
        let goals = self.store.get_user_goals(user_id).await?.unwrap_or_default();
        let thirst = thirst_meter(glasses, goals.water_goal_glasses());

        self.write_character(
            user_id,
            &CharacterUpdate {
                thirst_meter: Some(thirst),
                ..Default::default()
            },
        )
        .await?;
        Ok(thirst)
    }

    /// Run the weekly rollover if seven days have passed since the week
    /// started. Returns the record written for the closed week, if any.
    pub async fn rollover_if_due(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> EngineResult<Option<WeeklyRecord>> {
        let guard = self.locks.acquire(user_id).await;
        self.rollover_locked(&guard, now).await
    }

    // -----------------------------------------------------------------------
    // Lock-held helpers
    // -----------------------------------------------------------------------

    async fn ensure_quests_locked(
        &self,
        guard: &UserGuard,
        today: GameDate,
    ) -> EngineResult<Vec<Quest>> {
        let user_id = guard.user_id();

        let existing = self.store.find_quests(user_id, today).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let Some(character) = self.store.get_character(user_id).await? else {
            tracing::warn!(user_id, "No character found; skipping quest generation");
            return Ok(Vec::new());
        };

        let specs = plan_daily_quests(character.dungeon_tier, &mut rand::rng());
        let quests = self.store.create_quests(user_id, today, &specs).await?;
        tracing::info!(
            user_id,
            %today,
            tier = character.dungeon_tier,
            count = quests.len(),
            "Generated daily quests"
        );
        Ok(quests)
    }

    /// Reconcile `date`'s quests against the day's facts. Nothing is
    /// written; callers persist the result through `apply_evaluation`
    /// together with their character write.
    async fn evaluate_locked(
        &self,
        guard: &UserGuard,
        date: GameDate,
    ) -> EngineResult<DayEvaluation> {
        let user_id = guard.user_id();

        let quests = self.store.find_quests(user_id, date).await?;
        let day = self.load_facts(user_id, date).await?;

        if quests.is_empty() {
            return Ok(DayEvaluation {
                summary: EvaluationSummary::default(),
                day,
                newly_completed: Vec::new(),
            });
        }
        if !day.goals_known {
            tracing::warn!(user_id, "No goals found for user; leaving quests unchanged");
            return Ok(DayEvaluation {
                summary: stored_summary(&quests),
                day,
                newly_completed: Vec::new(),
            });
        }

        let reconciliation = reconcile(&quests, &day.facts);
        for (quest_id, tag) in &reconciliation.unrecognized {
            let err = CoreError::InvalidState(format!("unrecognized quest type '{tag}'"));
            tracing::warn!(user_id, quest_id, error = %err, "Treating quest as incomplete");
        }

        let summary = reconciliation.summary;
        tracing::debug!(
            user_id,
            %date,
            completed = summary.completed,
            total = summary.total,
            newly_completed = summary.newly_completed,
            "Evaluated quests"
        );
        Ok(DayEvaluation {
            summary,
            day,
            newly_completed: reconciliation.newly_completed,
        })
    }

    /// Close every day with quests that lies after the character's last
    /// closed day and before `before`. A user without a character has
    /// nothing to close.
    async fn close_pending_days_locked(
        &self,
        guard: &UserGuard,
        before: GameDate,
    ) -> EngineResult<()> {
        let user_id = guard.user_id();

        let Some(character) = self.store.get_character(user_id).await? else {
            return Ok(());
        };
        let pending = self
            .store
            .find_quest_dates(user_id, character.last_closed_date, before)
            .await?;

        for date in pending {
            self.close_day_locked(guard, date).await?;
        }
        Ok(())
    }

    /// Evaluate `date`, resolve combat for late completions, apply the
    /// health penalty and mark the day closed, all in one store write.
    async fn close_day_locked(
        &self,
        guard: &UserGuard,
        date: GameDate,
    ) -> EngineResult<EndOfDayView> {
        let user_id = guard.user_id();

        let evaluation = self.evaluate_locked(guard, date).await?;
        let character = self.require_character(user_id).await?;

        let combat = (evaluation.summary.newly_completed > 0)
            .then(|| resolve_combat(&character, &evaluation.summary));
        let (outcome, penalty) = end_of_day_penalty(&character, &evaluation.summary);

        let update = combat
            .as_ref()
            .map(|c| c.update.clone())
            .unwrap_or_default()
            .merge(penalty.unwrap_or_default())
            .merge(mark_day_closed(&character, date));
        self.apply_evaluation(user_id, &evaluation.newly_completed, &update)
            .await?;

        if let Some(combat) = &combat {
            log_combat(user_id, combat);
        }
        if outcome.health_lost {
            tracing::info!(
                user_id,
                %date,
                completed = outcome.completed,
                total = outcome.total,
                health = outcome.health,
                "End-of-day health penalty applied"
            );
        }

        Ok(EndOfDayView {
            date,
            outcome,
            combat: combat.map(|c| c.outcome).unwrap_or_default(),
            already_closed: false,
        })
    }

    async fn rollover_locked(
        &self,
        guard: &UserGuard,
        now: Timestamp,
    ) -> EngineResult<Option<WeeklyRecord>> {
        let user_id = guard.user_id();

        let Some(character) = self.store.get_character(user_id).await? else {
            return Ok(None);
        };
        let Some(rollover) = plan_rollover(&character, now) else {
            return Ok(None);
        };

        self.write_character(user_id, &rollover.update).await?;
        let record = self.store.create_weekly_record(&rollover.record).await?;

        tracing::info!(
            user_id,
            failed_week = rollover.failed_week,
            xp_forfeited = record.xp_forfeited,
            "Weekly rollover applied"
        );
        Ok(Some(record))
    }

    // -----------------------------------------------------------------------
    // Store helpers
    // -----------------------------------------------------------------------

    async fn load_facts(&self, user_id: DbId, date: GameDate) -> EngineResult<DayFacts> {
        let nutrition = self.store.sum_daily_nutrition(user_id, date).await?;
        let glasses = self.store.sum_daily_hydration(user_id, date).await?;
        let goals = self.store.get_user_goals(user_id).await?;

        Ok(DayFacts {
            facts: DailyFacts::new(nutrition, glasses, &goals.unwrap_or_default()),
            goals_known: goals.is_some(),
        })
    }

    async fn require_character(&self, user_id: DbId) -> EngineResult<Character> {
        self.store
            .get_character(user_id)
            .await?
            .ok_or_else(|| CoreError::character_not_found(user_id))
    }

    async fn apply_evaluation(
        &self,
        user_id: DbId,
        quest_ids: &[DbId],
        update: &CharacterUpdate,
    ) -> EngineResult<Character> {
        self.store
            .apply_evaluation(user_id, quest_ids, update)
            .await?
            .ok_or_else(|| CoreError::character_not_found(user_id))
    }

    async fn write_character(
        &self,
        user_id: DbId,
        update: &CharacterUpdate,
    ) -> EngineResult<Character> {
        self.store
            .update_character(user_id, update)
            .await?
            .ok_or_else(|| CoreError::character_not_found(user_id))
    }
}

fn log_combat(user_id: DbId, combat: &CombatResolution) {
    let outcome = &combat.outcome;
    if outcome.enemy_defeated {
        tracing::info!(
            user_id,
            xp_gained = outcome.xp_gained,
            coins_gained = outcome.coins_gained,
            "Enemy defeated"
        );
    }
    if let Some(level) = outcome.new_level {
        tracing::info!(user_id, level, "Character levelled up");
    }
    if combat.damage > 0 {
        tracing::debug!(user_id, damage = combat.damage, "Damage dealt to enemy");
    }
}
