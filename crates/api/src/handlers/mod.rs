//! Request handlers.
//!
//! Handlers extract the caller, delegate to the [`ProgressionEngine`]
//! (`nutriquest_engine::ProgressionEngine`) held in state, and map errors
//! via [`AppError`](crate::error::AppError).

pub mod game;
