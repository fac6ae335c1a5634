//! In-memory [`ProgressionStore`].
//!
//! Backs the engine and API test suites and lets the engine run without a
//! database. Also carries the seeding helpers those suites need (users,
//! characters, food and water logs) and a switch to simulate an outage.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use nutriquest_core::character::{
    xp_to_next_for, Character, CharacterUpdate, DEFAULT_MAX_HEALTH,
};
use nutriquest_core::facts::{DailyNutrition, MealType, UserGoals};
use nutriquest_core::quest::{Quest, QuestSpec};
use nutriquest_core::quest_catalog::{enemy_hp_for_tier, QUEST_XP_REWARD};
use nutriquest_core::store::{ProgressionStore, StoreError, StoreResult};
use nutriquest_core::types::{DbId, GameDate, Timestamp};
use nutriquest_core::weekly_cycle::{CreateWeeklyRecord, WeeklyRecord};

/// A single logged food item.
#[derive(Debug, Clone, Default)]
pub struct FoodEntry {
    pub meal_type: Option<MealType>,
    pub calories: f64,
    pub protein: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub is_fruit: bool,
    pub is_vegetable: bool,
}

impl FoodEntry {
    pub fn meal(meal_type: MealType, calories: f64) -> Self {
        Self {
            meal_type: Some(meal_type),
            calories,
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Tables {
    next_id: DbId,
    goals: HashMap<DbId, UserGoals>,
    characters: HashMap<DbId, Character>,
    quests: Vec<Quest>,
    food: Vec<(DbId, GameDate, FoodEntry)>,
    water: Vec<(DbId, GameDate, i32)>,
    weekly: Vec<WeeklyRecord>,
    unavailable: bool,
    fail_character_writes: bool,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the tables, failing if an outage is being simulated.
    fn available(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        let tables = self.tables();
        if tables.unavailable {
            return Err(StoreError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "in-memory store marked unavailable",
            )));
        }
        Ok(tables)
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    /// Register a user with the given goals.
    pub fn insert_user(&self, user_id: DbId, goals: UserGoals) {
        self.tables().goals.insert(user_id, goals);
    }

    /// Create the character a new registration would get.
    pub fn create_character(&self, user_id: DbId, now: Timestamp) -> Character {
        let character = Character {
            id: 0,
            user_id,
            level: 1,
            xp: 0,
            xp_to_next: xp_to_next_for(1),
            health: DEFAULT_MAX_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
            coins: 0,
            dungeon_tier: 1,
            enemy_hp: enemy_hp_for_tier(1),
            enemy_max_hp: enemy_hp_for_tier(1),
            thirst_meter: 0,
            week_start_date: now,
            last_closed_date: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_character(character)
    }

    /// Store `character` as-is (its `id` is assigned here).
    pub fn insert_character(&self, mut character: Character) -> Character {
        let mut tables = self.tables();
        character.id = tables.next_id();
        tables
            .characters
            .insert(character.user_id, character.clone());
        character
    }

    /// Store a quest with a raw type tag, bypassing the catalog.
    pub fn insert_quest(&self, user_id: DbId, date: GameDate, quest_type: &str) -> Quest {
        let mut tables = self.tables();
        let quest = Quest {
            id: tables.next_id(),
            user_id,
            quest_date: date,
            quest_type: quest_type.to_string(),
            description: quest_type.to_string(),
            xp_reward: QUEST_XP_REWARD,
            completed: false,
            created_at: Utc::now(),
        };
        tables.quests.push(quest.clone());
        quest
    }

    pub fn log_food(&self, user_id: DbId, date: GameDate, entry: FoodEntry) {
        self.tables().food.push((user_id, date, entry));
    }

    pub fn log_water(&self, user_id: DbId, date: GameDate, glasses: i32) {
        self.tables().water.push((user_id, date, glasses));
    }

    /// Make every store call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.tables().unavailable = unavailable;
    }

    /// Make every character write fail until switched back. Reads and
    /// quest writes keep working.
    pub fn set_fail_character_writes(&self, fail: bool) {
        self.tables().fail_character_writes = fail;
    }

    /// Number of quests stored for (user, date).
    pub fn quest_count(&self, user_id: DbId, date: GameDate) -> usize {
        self.tables()
            .quests
            .iter()
            .filter(|q| q.user_id == user_id && q.quest_date == date)
            .count()
    }
}

fn write_refused() -> StoreError {
    StoreError::new(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "in-memory store refused character write",
    ))
}

#[async_trait]
impl ProgressionStore for InMemoryStore {
    async fn get_character(&self, user_id: DbId) -> StoreResult<Option<Character>> {
        Ok(self.available()?.characters.get(&user_id).cloned())
    }

    async fn update_character(
        &self,
        user_id: DbId,
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>> {
        let mut tables = self.available()?;
        if tables.fail_character_writes {
            return Err(write_refused());
        }
        Ok(tables.characters.get_mut(&user_id).map(|c| {
            update.apply_to(c);
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn find_quests(&self, user_id: DbId, date: GameDate) -> StoreResult<Vec<Quest>> {
        Ok(self
            .available()?
            .quests
            .iter()
            .filter(|q| q.user_id == user_id && q.quest_date == date)
            .cloned()
            .collect())
    }

    async fn create_quests(
        &self,
        user_id: DbId,
        date: GameDate,
        specs: &[QuestSpec],
    ) -> StoreResult<Vec<Quest>> {
        let mut tables = self.available()?;
        let now = Utc::now();

        for spec in specs {
            let duplicate = tables.quests.iter().any(|q| {
                q.user_id == user_id
                    && q.quest_date == date
                    && q.quest_type == spec.quest_type.as_str()
            });
            if duplicate {
                continue;
            }
            let id = tables.next_id();
            tables.quests.push(Quest {
                id,
                user_id,
                quest_date: date,
                quest_type: spec.quest_type.as_str().to_string(),
                description: spec.description.clone(),
                xp_reward: spec.xp_reward,
                completed: false,
                created_at: now,
            });
        }

        Ok(tables
            .quests
            .iter()
            .filter(|q| q.user_id == user_id && q.quest_date == date)
            .cloned()
            .collect())
    }

    async fn update_quest_completion(
        &self,
        quest_id: DbId,
        completed: bool,
    ) -> StoreResult<Option<Quest>> {
        let mut tables = self.available()?;
        Ok(tables
            .quests
            .iter_mut()
            .find(|q| q.id == quest_id)
            .map(|q| {
                q.completed = completed;
                q.clone()
            }))
    }

    async fn find_quest_dates(
        &self,
        user_id: DbId,
        after: Option<GameDate>,
        before: GameDate,
    ) -> StoreResult<Vec<GameDate>> {
        let dates: BTreeSet<GameDate> = self
            .available()?
            .quests
            .iter()
            .filter(|q| q.user_id == user_id && q.quest_date < before)
            .filter(|q| after.map_or(true, |after| q.quest_date > after))
            .map(|q| q.quest_date)
            .collect();
        Ok(dates.into_iter().collect())
    }

    async fn apply_evaluation(
        &self,
        user_id: DbId,
        quest_ids: &[DbId],
        update: &CharacterUpdate,
    ) -> StoreResult<Option<Character>> {
        let mut tables = self.available()?;
        if tables.fail_character_writes {
            return Err(write_refused());
        }
        if !tables.characters.contains_key(&user_id) {
            return Ok(None);
        }

        for quest in tables
            .quests
            .iter_mut()
            .filter(|q| q.user_id == user_id && quest_ids.contains(&q.id))
        {
            quest.completed = true;
        }
        Ok(tables.characters.get_mut(&user_id).map(|c| {
            update.apply_to(c);
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn sum_daily_nutrition(
        &self,
        user_id: DbId,
        date: GameDate,
    ) -> StoreResult<DailyNutrition> {
        let tables = self.available()?;
        let mut totals = DailyNutrition::default();
        let mut meal_types = BTreeSet::new();

        for (_, _, entry) in tables
            .food
            .iter()
            .filter(|(u, d, _)| *u == user_id && *d == date)
        {
            totals.calories += entry.calories;
            totals.protein += entry.protein;
            totals.fiber += entry.fiber;
            totals.sodium += entry.sodium;
            totals.has_fruit_or_veg |= entry.is_fruit || entry.is_vegetable;
            meal_types.extend(entry.meal_type);
        }

        totals.meal_types = meal_types;
        Ok(totals)
    }

    async fn sum_daily_hydration(&self, user_id: DbId, date: GameDate) -> StoreResult<i32> {
        Ok(self
            .available()?
            .water
            .iter()
            .filter(|(u, d, _)| *u == user_id && *d == date)
            .map(|(_, _, glasses)| *glasses)
            .sum())
    }

    async fn get_user_goals(&self, user_id: DbId) -> StoreResult<Option<UserGoals>> {
        Ok(self.available()?.goals.get(&user_id).copied())
    }

    async fn create_weekly_record(&self, input: &CreateWeeklyRecord) -> StoreResult<WeeklyRecord> {
        let mut tables = self.available()?;
        let record = WeeklyRecord {
            id: tables.next_id(),
            user_id: input.user_id,
            week_start: input.week_start,
            week_end: input.week_end,
            final_health: input.final_health,
            xp_forfeited: input.xp_forfeited,
            failed: input.failed,
            created_at: Utc::now(),
        };
        tables.weekly.push(record.clone());
        Ok(record)
    }

    async fn list_weekly_records(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> StoreResult<Vec<WeeklyRecord>> {
        let tables = self.available()?;
        let mut records: Vec<WeeklyRecord> = tables
            .weekly
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.week_start.cmp(&a.week_start));
        records.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(records)
    }
}
