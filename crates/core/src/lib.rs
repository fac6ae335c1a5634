//! Domain logic for the NutriQuest progression loop.
//!
//! Everything in this crate is free of I/O: quest generation plans, quest
//! completion rules, combat resolution, thirst and weekly-cycle math. The
//! [`store::ProgressionStore`] trait describes the data access the
//! orchestration layer needs; concrete stores live in other crates.

pub mod character;
pub mod combat;
pub mod error;
pub mod facts;
pub mod hydration;
pub mod quest;
pub mod quest_catalog;
pub mod quest_evaluation;
pub mod quest_generation;
pub mod store;
pub mod types;
pub mod weekly_cycle;
pub mod weighted;
