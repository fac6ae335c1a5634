//! [`ProgressionStore`] backed by PostgreSQL.

use async_trait::async_trait;
use nutriquest_core::character::{Character, CharacterUpdate};
use nutriquest_core::facts::{DailyNutrition, UserGoals};
use nutriquest_core::quest::{Quest, QuestSpec};
use nutriquest_core::store::{ProgressionStore, StoreError, StoreResult};
use nutriquest_core::types::{DbId, GameDate};
use nutriquest_core::weekly_cycle::{CreateWeeklyRecord, WeeklyRecord};

use crate::repositories::{
    CharacterRepo, FoodLogRepo, QuestRepo, UserRepo, WaterLogRepo, WeeklyRecordRepo,
};
use crate::DbPool;

/// Delegates each store operation to the matching repository.
#[derive(Clone)]
pub struct PgProgressionStore {
    pool: DbPool,
}

impl PgProgressionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_err(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Progression store query failed");
    StoreError::new(err)
}

#[async_trait]
impl ProgressionStore for PgProgressionStore {
    async fn get_character(&self, user_id: DbId) -> StoreResult<Option<Character>> {
        let row = CharacterRepo::find_by_user(&self.pool, user_id)
            .await
            .map_err(store_err)?;
        Ok(row.map(Character::from))
    }

    async fn update_character(
        &self,
        user_id: DbId,
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>> {
        let row = CharacterRepo::update(&self.pool, user_id, update)
            .await
            .map_err(store_err)?;
        Ok(row.map(Character::from))
    }

    async fn find_quests(&self, user_id: DbId, date: GameDate) -> StoreResult<Vec<Quest>> {
        let rows = QuestRepo::list_for_day(&self.pool, user_id, date)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Quest::from).collect())
    }

    async fn create_quests(
        &self,
        user_id: DbId,
        date: GameDate,
        specs: &[QuestSpec],
    ) -> StoreResult<Vec<Quest>> {
        let rows = QuestRepo::create_for_day(&self.pool, user_id, date, specs)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Quest::from).collect())
    }

    async fn update_quest_completion(
        &self,
        quest_id: DbId,
        completed: bool,
    ) -> StoreResult<Option<Quest>> {
        let row = QuestRepo::set_completed(&self.pool, quest_id, completed)
            .await
            .map_err(store_err)?;
        Ok(row.map(Quest::from))
    }

    async fn find_quest_dates(
        &self,
        user_id: DbId,
        after: Option<GameDate>,
        before: GameDate,
    ) -> StoreResult<Vec<GameDate>> {
        QuestRepo::list_dates(&self.pool, user_id, after, before)
            .await
            .map_err(store_err)
    }

    async fn apply_evaluation(
        &self,
        user_id: DbId,
        quest_ids: &[DbId],
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>> {
        let row = CharacterRepo::apply_evaluation(&self.pool, user_id, quest_ids, update)
            .await
            .map_err(store_err)?;
        Ok(row.map(Character::from))
    }

    async fn sum_daily_nutrition(
        &self,
        user_id: DbId,
        date: GameDate,
    ) -> StoreResult<DailyNutrition> {
        let row = FoodLogRepo::daily_totals(&self.pool, user_id, date)
            .await
            .map_err(store_err)?;
        Ok(row.into())
    }

    async fn sum_daily_hydration(&self, user_id: DbId, date: GameDate) -> StoreResult<i32> {
        WaterLogRepo::daily_glasses(&self.pool, user_id, date)
            .await
            .map_err(store_err)
    }

    async fn get_user_goals(&self, user_id: DbId) -> StoreResult<Option<UserGoals>> {
        let row = UserRepo::find_goals(&self.pool, user_id)
            .await
            .map_err(store_err)?;
        Ok(row.map(UserGoals::from))
    }

    async fn create_weekly_record(&self, input: &CreateWeeklyRecord) -> StoreResult<WeeklyRecord> {
        let row = WeeklyRecordRepo::create(&self.pool, input)
            .await
            .map_err(store_err)?;
        Ok(row.into())
    }

    async fn list_weekly_records(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> StoreResult<Vec<WeeklyRecord>> {
        let rows = WeeklyRecordRepo::list_recent(&self.pool, user_id, limit)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(WeeklyRecord::from).collect())
    }
}
