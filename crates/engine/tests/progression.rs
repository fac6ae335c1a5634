//! Integration tests for `ProgressionEngine` over the in-memory store.
//!
//! Every test pins `now` so quest dates and week boundaries are
//! deterministic. Food and water logs are seeded directly into the store,
//! the same way the logging endpoints would write them.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, TimeZone, Utc};
use nutriquest_core::character::Character;
use nutriquest_core::error::CoreError;
use nutriquest_core::facts::{MealType, UserGoals};
use nutriquest_core::quest::{QuestSpec, QuestType};
use nutriquest_core::quest_catalog::{CORE_QUESTS, QUEST_XP_REWARD};
use nutriquest_core::store::ProgressionStore;
use nutriquest_core::types::{DbId, GameDate};
use nutriquest_engine::{EngineConfig, FoodEntry, InMemoryStore, ProgressionEngine};

const USER: DbId = 1;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
}

fn today() -> GameDate {
    now().date_naive()
}

fn setup() -> (Arc<InMemoryStore>, ProgressionEngine) {
    let store = Arc::new(InMemoryStore::new());
    let engine = ProgressionEngine::new(store.clone(), EngineConfig::default());
    (store, engine)
}

/// Register `USER` with default goals and a fresh character.
fn seed_player(store: &InMemoryStore) -> Character {
    store.insert_user(USER, UserGoals::default());
    store.create_character(USER, now())
}

/// Replace the player's character with a modified copy of the default one.
fn seed_custom(store: &InMemoryStore, edit: impl FnOnce(&mut Character)) -> Character {
    store.insert_user(USER, UserGoals::default());
    let mut character = store.create_character(USER, now());
    edit(&mut character);
    store.insert_character(character)
}

fn spec(quest_type: QuestType) -> QuestSpec {
    QuestSpec {
        quest_type,
        description: format!("{quest_type} quest"),
        xp_reward: QUEST_XP_REWARD,
    }
}

async fn seed_quests(store: &InMemoryStore, date: GameDate, types: &[QuestType]) {
    let specs: Vec<QuestSpec> = types.iter().copied().map(spec).collect();
    store.create_quests(USER, date, &specs).await.unwrap();
}

fn log_all_meals(store: &InMemoryStore, date: GameDate) {
    store.log_food(USER, date, FoodEntry::meal(MealType::Breakfast, 400.0));
    store.log_food(USER, date, FoodEntry::meal(MealType::Lunch, 600.0));
    store.log_food(USER, date, FoodEntry::meal(MealType::Dinner, 700.0));
}

const FOUR_QUESTS: [QuestType; 4] = [
    QuestType::LogBreakfast,
    QuestType::LogLunch,
    QuestType::LogDinner,
    QuestType::WaterGoal,
];

// ---------------------------------------------------------------------------
// Test: refresh generates quests once per day
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_generates_quests_once_per_day() {
    let (store, engine) = setup();
    seed_player(&store);

    let first = engine.refresh_state_at(USER, now()).await.unwrap();
    assert_eq!(first.quests.len(), 5);

    let second = engine.refresh_state_at(USER, now()).await.unwrap();
    let first_ids: Vec<DbId> = first.quests.iter().map(|q| q.id).collect();
    let second_ids: Vec<DbId> = second.quests.iter().map(|q| q.id).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(store.quest_count(USER, today()), 5);
}

// ---------------------------------------------------------------------------
// Test: generated quests always include the three meal quests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generated_quests_include_core_meals() {
    let (store, engine) = setup();
    seed_player(&store);

    let quests = engine.ensure_today_quests(USER, today()).await.unwrap();
    for core in CORE_QUESTS {
        assert!(
            quests.iter().any(|q| q.kind() == Some(core.quest_type)),
            "missing {}",
            core.quest_type
        );
    }
    assert!(quests.iter().all(|q| !q.completed));
    assert!(quests.iter().all(|q| q.xp_reward == QUEST_XP_REWARD));
}

// ---------------------------------------------------------------------------
// Test: quest count follows the dungeon tier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tier_two_gets_six_quests() {
    let (store, engine) = setup();
    seed_custom(&store, |c| {
        c.dungeon_tier = 2;
        c.enemy_hp = 6;
        c.enemy_max_hp = 6;
    });

    let quests = engine.ensure_today_quests(USER, today()).await.unwrap();
    assert_eq!(quests.len(), 6);
}

// ---------------------------------------------------------------------------
// Test: no character means no quests and a not-found refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_character_generates_nothing() {
    let (store, engine) = setup();
    store.insert_user(USER, UserGoals::default());

    let quests = engine.ensure_today_quests(USER, today()).await.unwrap();
    assert!(quests.is_empty());
    assert_eq!(store.quest_count(USER, today()), 0);

    let rolled = engine.rollover_if_due(USER, now()).await.unwrap();
    assert!(rolled.is_none());

    let err = engine.refresh_state_at(USER, now()).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "Character", id: USER });
}

#[tokio::test]
async fn missing_character_fails_evaluate_and_thirst() {
    let (_store, engine) = setup();

    let err = engine.evaluate_at(USER, now()).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });

    let err = engine.update_thirst(USER, today()).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: completing every quest damages the enemy and awards XP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_clear_below_enemy_hp_is_not_a_defeat() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &FOUR_QUESTS).await;
    log_all_meals(&store, today());
    store.log_water(USER, today(), 8);

    let view = engine.evaluate_at(USER, now()).await.unwrap();

    assert_eq!(view.evaluation.completed, 4);
    assert_eq!(view.evaluation.total, 4);
    assert_eq!(view.evaluation.newly_completed, 4);
    assert!(!view.combat.enemy_defeated);
    assert_eq!(view.combat.xp_gained, 4 * QUEST_XP_REWARD);
    assert_eq!(view.combat.coins_gained, 0);
    assert!(view.combat.leveled_up);
    assert_eq!(view.combat.new_level, Some(2));

    assert_eq!(view.character.enemy_hp, 1);
    assert_eq!(view.character.level, 2);
    assert_eq!(view.character.xp, 0);
    assert_eq!(view.character.xp_to_next, 200);
    assert_eq!(view.character.dungeon_tier, 1);
    assert!(view.quests.iter().all(|q| q.completed));
}

// ---------------------------------------------------------------------------
// Test: re-evaluating does not re-award anything
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_evaluation_awards_once() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &FOUR_QUESTS).await;
    store.log_food(USER, today(), FoodEntry::meal(MealType::Breakfast, 350.0));

    let first = engine.evaluate_at(USER, now()).await.unwrap();
    assert_eq!(first.evaluation.newly_completed, 1);
    assert_eq!(first.character.enemy_hp, 4);
    assert_eq!(first.character.xp, QUEST_XP_REWARD);

    let second = engine.evaluate_at(USER, now()).await.unwrap();
    assert_eq!(second.evaluation.completed, 1);
    assert_eq!(second.evaluation.newly_completed, 0);
    assert_eq!(second.combat.xp_gained, 0);
    assert_eq!(second.character.enemy_hp, 4);
    assert_eq!(second.character.xp, QUEST_XP_REWARD);
}

// ---------------------------------------------------------------------------
// Test: a completed quest stays completed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completion_is_monotonic_within_a_day() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &[QuestType::CalorieTarget]).await;

    store.log_food(USER, today(), FoodEntry::meal(MealType::Lunch, 1500.0));
    let summary = engine.evaluate_quests(USER, today()).await.unwrap();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.newly_completed, 1);

    // 1500 + 1500 is well past 110% of the 2000 kcal goal.
    store.log_food(USER, today(), FoodEntry::meal(MealType::Dinner, 1500.0));
    let summary = engine.evaluate_quests(USER, today()).await.unwrap();
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.newly_completed, 0);

    let quests = store.find_quests(USER, today()).await.unwrap();
    assert!(quests[0].completed);
}

// ---------------------------------------------------------------------------
// Test: an empty day fails the calorie and sodium quests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nothing_eaten_fails_calorie_and_sodium() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &[QuestType::CalorieTarget, QuestType::Sodium]).await;

    let summary = engine.evaluate_quests(USER, today()).await.unwrap();
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.total, 2);
}

// ---------------------------------------------------------------------------
// Test: without goals the stored state is reported unchanged
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_goals_leave_quests_untouched() {
    let (store, engine) = setup();
    store.create_character(USER, now());
    seed_quests(&store, today(), &[QuestType::LogBreakfast]).await;
    store.log_food(USER, today(), FoodEntry::meal(MealType::Breakfast, 300.0));

    let summary = engine.evaluate_quests(USER, today()).await.unwrap();
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.newly_completed, 0);
}

// ---------------------------------------------------------------------------
// Test: an unknown quest type counts as incomplete without failing the batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_quest_type_does_not_block_evaluation() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &[QuestType::LogBreakfast]).await;
    let unknown = store.insert_quest(USER, today(), "juggle");
    store.log_food(USER, today(), FoodEntry::meal(MealType::Breakfast, 300.0));

    let view = engine.evaluate_at(USER, now()).await.unwrap();
    assert_eq!(view.evaluation.completed, 1);
    assert_eq!(view.evaluation.total, 2);
    assert_eq!(view.evaluation.newly_completed, 1);

    let quests = store.find_quests(USER, today()).await.unwrap();
    let juggle = quests.iter().find(|q| q.id == unknown.id).unwrap();
    assert!(!juggle.completed);
}

// ---------------------------------------------------------------------------
// Test: defeating the enemy pays out and advances the tier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn defeat_at_level_fourteen_advances_to_tier_three() {
    let (store, engine) = setup();
    seed_custom(&store, |c| {
        c.level = 14;
        c.xp = 1300;
        c.xp_to_next = 1400;
        c.dungeon_tier = 2;
        c.enemy_hp = 1;
        c.enemy_max_hp = 6;
        c.coins = 5;
    });
    seed_quests(&store, today(), &[QuestType::LogBreakfast]).await;
    store.log_food(USER, today(), FoodEntry::meal(MealType::Breakfast, 300.0));

    let view = engine.evaluate_at(USER, now()).await.unwrap();

    // 25 for the quest plus 50 per tier for the defeat.
    assert!(view.combat.enemy_defeated);
    assert_eq!(view.combat.xp_gained, 125);
    assert_eq!(view.combat.coins_gained, 40);
    assert_eq!(view.combat.new_level, Some(15));

    let c = &view.character;
    assert_eq!(c.level, 15);
    assert_eq!(c.xp, 25);
    assert_eq!(c.xp_to_next, 1500);
    assert_eq!(c.coins, 45);
    assert_eq!(c.dungeon_tier, 3);
    assert_eq!(c.enemy_hp, 7);
    assert_eq!(c.enemy_max_hp, 7);
}

#[tokio::test]
async fn zero_hp_without_full_clear_is_not_a_defeat() {
    let (store, engine) = setup();
    seed_custom(&store, |c| c.enemy_hp = 1);
    seed_quests(&store, today(), &[QuestType::LogBreakfast, QuestType::Fiber]).await;
    store.log_food(USER, today(), FoodEntry::meal(MealType::Breakfast, 300.0));

    let view = engine.evaluate_at(USER, now()).await.unwrap();
    assert!(!view.combat.enemy_defeated);
    assert_eq!(view.character.enemy_hp, 0);
    assert_eq!(view.character.dungeon_tier, 1);
}

// ---------------------------------------------------------------------------
// Test: thirst follows today's water against the goal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn thirst_tracks_hydration() {
    let (store, engine) = setup();
    seed_player(&store);

    let view = engine.evaluate_at(USER, now()).await.unwrap();
    assert_eq!(view.thirst_meter, 7);
    assert_eq!(view.character.thirst_meter, 7);

    // 2 of 8 glasses: round(0.75 * 7) = 5.
    store.log_water(USER, today(), 2);
    assert_eq!(engine.update_thirst(USER, today()).await.unwrap(), 5);

    store.log_water(USER, today(), 10);
    assert_eq!(engine.update_thirst(USER, today()).await.unwrap(), 0);
    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.thirst_meter, 0);
}

#[tokio::test]
async fn thirst_uses_the_users_water_goal() {
    let (store, engine) = setup();
    store.insert_user(
        USER,
        UserGoals {
            water_goal_oz: Some(32),
            ..Default::default()
        },
    );
    store.create_character(USER, now());
    store.log_water(USER, today(), 4);

    assert_eq!(engine.update_thirst(USER, today()).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: weekly rollover
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_week_forfeits_xp_and_restores_health() {
    let (store, engine) = setup();
    let week_start = now() - Duration::days(7);
    seed_custom(&store, |c| {
        c.health = 0;
        c.xp = 40;
        c.level = 3;
        c.xp_to_next = 300;
        c.coins = 60;
        c.thirst_meter = 5;
        c.week_start_date = week_start;
    });

    let view = engine.refresh_state_at(USER, now()).await.unwrap();
    let c = &view.character;
    assert_eq!(c.health, 7);
    assert_eq!(c.xp, 0);
    assert_eq!(c.level, 3);
    assert_eq!(c.coins, 60);
    assert_eq!(c.thirst_meter, 0);
    assert_eq!(c.week_start_date, now());

    let history = engine.weekly_history(USER).await.unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert!(record.failed);
    assert_eq!(record.final_health, 0);
    assert_eq!(record.xp_forfeited, 40);
    assert_eq!(record.week_start, week_start);
    assert_eq!(record.week_end, week_start + Duration::days(6));
}

#[tokio::test]
async fn surviving_week_keeps_xp() {
    let (store, engine) = setup();
    seed_custom(&store, |c| {
        c.health = 3;
        c.xp = 40;
        c.week_start_date = now() - Duration::days(9);
    });

    let record = engine.rollover_if_due(USER, now()).await.unwrap().unwrap();
    assert!(!record.failed);
    assert_eq!(record.final_health, 3);
    assert_eq!(record.xp_forfeited, 0);

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 7);
    assert_eq!(character.xp, 40);
}

#[tokio::test]
async fn rollover_not_due_before_seven_days() {
    let (store, engine) = setup();
    seed_custom(&store, |c| {
        c.health = 2;
        c.week_start_date = now() - Duration::days(6) - Duration::hours(23);
    });

    assert!(engine.rollover_if_due(USER, now()).await.unwrap().is_none());
    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 2);
    assert!(engine.weekly_history(USER).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: end-of-day health penalty
// ---------------------------------------------------------------------------

#[tokio::test]
async fn end_of_day_penalises_under_half() {
    let (store, engine) = setup();
    seed_player(&store);
    let yesterday = today() - Duration::days(1);
    seed_quests(
        &store,
        yesterday,
        &[
            QuestType::LogBreakfast,
            QuestType::LogLunch,
            QuestType::LogDinner,
            QuestType::Fiber,
            QuestType::WaterGoal,
        ],
    )
    .await;
    store.log_food(USER, yesterday, FoodEntry::meal(MealType::Breakfast, 300.0));
    store.log_food(USER, yesterday, FoodEntry::meal(MealType::Lunch, 300.0));

    let view = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
    assert_eq!(view.date, yesterday);
    assert!(view.outcome.health_lost);
    assert_eq!(view.outcome.health, 6);
    assert_eq!(view.outcome.completed, 2);
    assert_eq!(view.outcome.total, 5);

    // Late completions still count for combat.
    assert_eq!(view.combat.xp_gained, 2 * QUEST_XP_REWARD);
    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 6);
    assert_eq!(character.enemy_hp, 3);
}

#[tokio::test]
async fn end_of_day_half_done_keeps_health() {
    let (store, engine) = setup();
    seed_player(&store);
    let yesterday = today() - Duration::days(1);
    seed_quests(&store, yesterday, &FOUR_QUESTS).await;
    store.log_food(USER, yesterday, FoodEntry::meal(MealType::Breakfast, 300.0));
    store.log_food(USER, yesterday, FoodEntry::meal(MealType::Lunch, 300.0));

    let view = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
    assert!(!view.outcome.health_lost);
    assert_eq!(view.outcome.health, 7);
}

#[tokio::test]
async fn end_of_day_health_floors_at_zero() {
    let (store, engine) = setup();
    seed_custom(&store, |c| c.health = 0);
    let yesterday = today() - Duration::days(1);
    seed_quests(&store, yesterday, &FOUR_QUESTS).await;

    let view = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
    assert!(view.outcome.health_lost);
    assert_eq!(view.outcome.health, 0);
    assert_eq!(view.combat.xp_gained, 0);

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 0);
}

#[tokio::test]
async fn end_of_day_without_quests_is_harmless() {
    let (store, engine) = setup();
    seed_player(&store);

    let view = engine
        .process_end_of_day_at(USER, today() - Duration::days(1), now())
        .await
        .unwrap();
    assert!(!view.outcome.health_lost);
    assert_eq!(view.outcome.total, 0);
    assert_eq!(view.outcome.health, 7);
}

#[tokio::test]
async fn end_of_day_closes_each_date_once() {
    let (store, engine) = setup();
    seed_player(&store);
    let yesterday = today() - Duration::days(1);
    seed_quests(&store, yesterday, &FOUR_QUESTS).await;

    let first = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
    assert!(first.outcome.health_lost);
    assert!(!first.already_closed);
    assert_eq!(first.outcome.health, 6);

    for _ in 0..5 {
        let again = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
        assert!(again.already_closed);
        assert!(!again.outcome.health_lost);
        assert_eq!(again.outcome.health, 6);
        assert_eq!(again.outcome.total, 4);
    }

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 6);
    assert_eq!(character.last_closed_date, Some(yesterday));
}

#[tokio::test]
async fn end_of_day_rejects_today_and_later() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &FOUR_QUESTS).await;

    for date in [today(), today() + Duration::days(1)] {
        let err = engine.process_end_of_day_at(USER, date, now()).await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.health, 7);
    assert_eq!(character.last_closed_date, None);
}

#[tokio::test]
async fn end_of_day_closes_earlier_open_days_first() {
    let (store, engine) = setup();
    seed_player(&store);
    let three_days_ago = today() - Duration::days(3);
    let yesterday = today() - Duration::days(1);
    seed_quests(&store, three_days_ago, &FOUR_QUESTS).await;
    seed_quests(&store, yesterday, &FOUR_QUESTS).await;

    let view = engine.process_end_of_day_at(USER, yesterday, now()).await.unwrap();
    assert_eq!(view.outcome.health, 5);

    // The older day is covered by the marker now.
    let view = engine
        .process_end_of_day_at(USER, three_days_ago, now())
        .await
        .unwrap();
    assert!(view.already_closed);
    assert_eq!(view.outcome.health, 5);
}

// ---------------------------------------------------------------------------
// Test: a state refresh closes past days lazily
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_closes_an_incomplete_yesterday() {
    let (store, engine) = setup();
    seed_player(&store);
    let yesterday = today() - Duration::days(1);

    // Yesterday's visit generated quests; nothing was logged.
    let earlier = engine
        .refresh_state_at(USER, now() - Duration::days(1))
        .await
        .unwrap();
    assert!(earlier.quests.iter().all(|q| q.quest_date == yesterday));
    assert_eq!(earlier.character.health, 7);

    let view = engine.refresh_state_at(USER, now()).await.unwrap();
    assert_eq!(view.character.health, 6);
    assert_eq!(view.character.last_closed_date, Some(yesterday));

    let view = engine.refresh_state_at(USER, now()).await.unwrap();
    assert_eq!(view.character.health, 6);
}

#[tokio::test]
async fn refresh_rewards_late_completions_when_closing() {
    let (store, engine) = setup();
    seed_player(&store);
    let yesterday = today() - Duration::days(1);
    seed_quests(&store, yesterday, &FOUR_QUESTS).await;
    log_all_meals(&store, yesterday);

    let view = engine.refresh_state_at(USER, now()).await.unwrap();
    assert_eq!(view.character.health, 7);
    assert_eq!(view.character.enemy_hp, 2);
    assert_eq!(view.character.xp, 3 * QUEST_XP_REWARD);

    let quests = store.find_quests(USER, yesterday).await.unwrap();
    assert_eq!(quests.iter().filter(|q| q.completed).count(), 3);
}

#[tokio::test]
async fn closing_the_last_day_can_fail_the_week() {
    let (store, engine) = setup();
    seed_custom(&store, |c| {
        c.health = 1;
        c.xp = 40;
        c.week_start_date = now() - Duration::days(7);
    });
    seed_quests(&store, today() - Duration::days(1), &FOUR_QUESTS).await;

    let view = engine.refresh_state_at(USER, now()).await.unwrap();
    assert_eq!(view.character.health, 7);
    assert_eq!(view.character.xp, 0);

    let history = engine.weekly_history(USER).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].failed);
    assert_eq!(history[0].final_health, 0);
    assert_eq!(history[0].xp_forfeited, 40);
}

// ---------------------------------------------------------------------------
// Test: combat resolution as a standalone operation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_combat_without_character_is_not_found() {
    let (store, engine) = setup();
    store.insert_user(USER, UserGoals::default());

    let err = engine.resolve_combat(USER, today(), 1).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { entity: "Character", id: USER });
}

#[tokio::test]
async fn resolve_combat_damages_the_enemy() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &[QuestType::LogBreakfast, QuestType::LogLunch]).await;
    let quests = store.find_quests(USER, today()).await.unwrap();
    store.update_quest_completion(quests[0].id, true).await.unwrap();

    let outcome = engine.resolve_combat(USER, today(), 1).await.unwrap();
    assert!(!outcome.enemy_defeated);
    assert_eq!(outcome.xp_gained, QUEST_XP_REWARD);

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.enemy_hp, 4);
    assert_eq!(character.xp, QUEST_XP_REWARD);
}

#[tokio::test]
async fn resolve_combat_full_clear_defeats_the_enemy() {
    let (store, engine) = setup();
    seed_custom(&store, |c| c.enemy_hp = 1);
    seed_quests(&store, today(), &[QuestType::LogBreakfast, QuestType::LogLunch]).await;
    for quest in store.find_quests(USER, today()).await.unwrap() {
        store.update_quest_completion(quest.id, true).await.unwrap();
    }

    let outcome = engine.resolve_combat(USER, today(), 1).await.unwrap();

    // 25 for the quest plus 50 for a tier 1 defeat.
    assert!(outcome.enemy_defeated);
    assert_eq!(outcome.xp_gained, 75);
    assert_eq!(outcome.coins_gained, 20);

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.coins, 20);
    assert_eq!(character.dungeon_tier, 1);
    assert_eq!(character.enemy_hp, 5);
    assert_eq!(character.enemy_max_hp, 5);
}

// ---------------------------------------------------------------------------
// Test: a failed character write leaves completions to be awarded later
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_write_does_not_lose_rewards() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &FOUR_QUESTS).await;
    log_all_meals(&store, today());

    store.set_fail_character_writes(true);
    let err = engine.evaluate_at(USER, now()).await.unwrap_err();
    assert_matches!(err, CoreError::Store(_));
    let quests = store.find_quests(USER, today()).await.unwrap();
    assert!(quests.iter().all(|q| !q.completed));

    store.set_fail_character_writes(false);
    let view = engine.evaluate_at(USER, now()).await.unwrap();
    assert_eq!(view.evaluation.newly_completed, 3);
    assert_eq!(view.character.xp, 3 * QUEST_XP_REWARD);
    assert_eq!(view.character.enemy_hp, 2);
}

// ---------------------------------------------------------------------------
// Test: concurrent evaluations for one user lose no updates
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_evaluations_award_exactly_once() {
    let (store, engine) = setup();
    seed_player(&store);
    seed_quests(&store, today(), &FOUR_QUESTS).await;
    log_all_meals(&store, today());
    store.log_water(USER, today(), 8);

    let engine = Arc::new(engine);
    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(
            async move { engine.evaluate_at(USER, now()).await },
        ));
    }

    let mut newly_total = 0;
    for h in handles {
        let view = h.await.unwrap().unwrap();
        newly_total += view.evaluation.newly_completed;
    }
    assert_eq!(newly_total, 4);

    let character = store.get_character(USER).await.unwrap().unwrap();
    assert_eq!(character.enemy_hp, 1);
    assert_eq!(character.level, 2);
    assert_eq!(character.xp, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_refreshes_generate_one_set() {
    let (store, engine) = setup();
    seed_player(&store);

    let engine = Arc::new(engine);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.refresh_state_at(USER, now()).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(store.quest_count(USER, today()), 5);
}

// ---------------------------------------------------------------------------
// Test: store failures surface as CoreError::Store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_propagates() {
    let (store, engine) = setup();
    seed_player(&store);
    store.set_unavailable(true);

    let err = engine.refresh_state_at(USER, now()).await.unwrap_err();
    assert_matches!(err, CoreError::Store(_));

    let err = engine.evaluate_at(USER, now()).await.unwrap_err();
    assert_matches!(err, CoreError::Store(_));

    store.set_unavailable(false);
    assert!(engine.refresh_state_at(USER, now()).await.is_ok());
}

// ---------------------------------------------------------------------------
// Test: quest dates follow the configured UTC offset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quest_date_uses_configured_offset() {
    let store = Arc::new(InMemoryStore::new());
    let engine = ProgressionEngine::new(
        store.clone(),
        EngineConfig {
            utc_offset_minutes: -8 * 60,
            ..Default::default()
        },
    );
    seed_player(&store);

    // 03:00 UTC on the 4th is still the 3rd at UTC-8.
    let early = Utc.with_ymd_and_hms(2024, 3, 4, 3, 0, 0).unwrap();
    let view = engine.refresh_state_at(USER, early).await.unwrap();
    let expected = GameDate::from_ymd_opt(2024, 3, 3).unwrap();
    assert!(view.quests.iter().all(|q| q.quest_date == expected));
}
