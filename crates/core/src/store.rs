//! Data access the progression engine depends on.
//!
//! Implemented by the PostgreSQL store in `nutriquest-db` and by the
//! in-memory store in `nutriquest-engine`. Every method is a single,
//! individually atomic store operation; serialising a multi-step operation
//! per user is the caller's job. [`ProgressionStore::apply_evaluation`] is
//! the one method that spans quests and the character in one transaction.

use async_trait::async_trait;

use crate::character::{Character, CharacterUpdate};
use crate::facts::{DailyNutrition, UserGoals};
use crate::quest::{Quest, QuestSpec};
use crate::types::{DbId, GameDate};
use crate::weekly_cycle::{CreateWeeklyRecord, WeeklyRecord};

/// Failure reported by a store backend. The source error is kept intact.
#[derive(Debug, thiserror::Error)]
#[error("Store error: {0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProgressionStore: Send + Sync {
    /// The user's character, if one exists.
    async fn get_character(&self, user_id: DbId) -> StoreResult<Option<Character>>;

    /// Apply a partial update atomically. Returns `None` if the character
    /// does not exist.
    async fn update_character(
        &self,
        user_id: DbId,
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>>;

    /// All quests for (user, date), oldest first.
    async fn find_quests(&self, user_id: DbId, date: GameDate) -> StoreResult<Vec<Quest>>;

    /// Insert a quest set for (user, date) with `completed = false`.
    async fn create_quests(
        &self,
        user_id: DbId,
        date: GameDate,
        specs: &[QuestSpec],
    ) -> StoreResult<Vec<Quest>>;

    /// Set a quest's completion flag. Returns `None` if the quest is missing.
    async fn update_quest_completion(
        &self,
        quest_id: DbId,
        completed: bool,
    ) -> StoreResult<Option<Quest>>;

    /// Distinct dates with quests for the user, strictly after `after` (if
    /// given) and strictly before `before`, oldest first.
    async fn find_quest_dates(
        &self,
        user_id: DbId,
        after: Option<GameDate>,
        before: GameDate,
    ) -> StoreResult<Vec<GameDate>>;

    /// Mark `quest_ids` complete and apply `update` to the user's character
    /// as one transaction. Returns `None`, with nothing written, if the
    /// character does not exist.
    async fn apply_evaluation(
        &self,
        user_id: DbId,
        quest_ids: &[DbId],
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>>;

    /// Nutrition totals over the user's food logs for `date`.
    async fn sum_daily_nutrition(&self, user_id: DbId, date: GameDate)
        -> StoreResult<DailyNutrition>;

    /// Glasses of water logged by the user on `date`.
    async fn sum_daily_hydration(&self, user_id: DbId, date: GameDate) -> StoreResult<i32>;

    /// The user's goals, or `None` if the user does not exist.
    async fn get_user_goals(&self, user_id: DbId) -> StoreResult<Option<UserGoals>>;

    async fn create_weekly_record(&self, input: &CreateWeeklyRecord) -> StoreResult<WeeklyRecord>;

    /// Most recent weekly records first, at most `limit`.
    async fn list_weekly_records(&self, user_id: DbId, limit: i64)
        -> StoreResult<Vec<WeeklyRecord>>;
}
