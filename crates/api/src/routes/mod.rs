pub mod game;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /game/state                                      refresh and get state (GET)
/// /game/evaluate                                   evaluate quests (POST)
/// /game/end-of-day                                 close out a day (POST)
/// /game/history                                    weekly records (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/game", game::router())
}
