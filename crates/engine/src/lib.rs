//! Orchestration of the progression loop.
//!
//! [`ProgressionEngine`] wires the pure rules in `nutriquest_core` to a
//! [`ProgressionStore`](nutriquest_core::store::ProgressionStore) and runs
//! every multi-step operation for a user under that user's lock.

pub mod config;
pub mod engine;
pub mod locks;
pub mod memory;
pub mod views;

pub use config::EngineConfig;
pub use engine::ProgressionEngine;
pub use memory::{FoodEntry, InMemoryStore};
