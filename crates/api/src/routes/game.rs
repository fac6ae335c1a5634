//! Route definitions for the game loop.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::game;
use crate::state::AppState;

/// Game routes, nested under `/game`.
///
/// ```text
/// GET    /state          -> get_state
/// POST   /evaluate       -> evaluate
/// POST   /end-of-day     -> end_of_day
/// GET    /history        -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/state", get(game::get_state))
        .route("/evaluate", post(game::evaluate))
        .route("/end-of-day", post(game::end_of_day))
        .route("/history", get(game::history))
}
