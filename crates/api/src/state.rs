use std::sync::Arc;

use nutriquest_engine::ProgressionEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Progression engine; owns the store and the per-user locks.
    pub engine: Arc<ProgressionEngine>,
    /// Database pool, when the engine is backed by PostgreSQL. Only used by
    /// the health check.
    pub pool: Option<nutriquest_db::DbPool>,
}
