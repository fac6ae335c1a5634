//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod character_repo;
pub mod food_log_repo;
pub mod quest_repo;
pub mod user_repo;
pub mod water_log_repo;
pub mod weekly_record_repo;

pub use character_repo::CharacterRepo;
pub use food_log_repo::FoodLogRepo;
pub use quest_repo::QuestRepo;
pub use user_repo::UserRepo;
pub use water_log_repo::WaterLogRepo;
pub use weekly_record_repo::WeeklyRecordRepo;
