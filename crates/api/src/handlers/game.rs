//! Handlers for the game loop: state refresh, evaluation, end of day and
//! weekly history.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use nutriquest_core::types::GameDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /game/end-of-day`. The whole body is optional.
#[derive(Debug, Default, Deserialize)]
pub struct EndOfDayRequest {
    /// Day to close out. Defaults to yesterday in the game calendar.
    pub date: Option<GameDate>,
}

/// GET /game/state -- roll the week over if due, generate today's quests,
/// and return the character with today's quests.
pub async fn get_state(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.refresh_state(user.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /game/evaluate -- re-evaluate today's quests, resolve combat and
/// update thirst.
pub async fn evaluate(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.evaluate(user.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /game/end-of-day -- close out a past day and apply the health
/// penalty. Closing a day twice is a no-op.
pub async fn end_of_day(
    user: CurrentUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input = parse_end_of_day(&body)?;
    let today = state.engine.game_date(Utc::now());

    let date = match input.date {
        Some(date) => date,
        None => today
            .pred_opt()
            .ok_or_else(|| AppError::InternalError("Game date out of range".into()))?,
    };
    if date >= today {
        return Err(AppError::BadRequest(format!(
            "Only a past day can be closed, got {date} (today is {today})"
        )));
    }

    let view = state.engine.process_end_of_day(user.user_id, date).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /game/history -- most recent weekly records, newest first.
pub async fn history(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let records = state.engine.weekly_history(user.user_id).await?;
    Ok(Json(DataResponse { data: records }))
}

fn parse_end_of_day(body: &[u8]) -> AppResult<EndOfDayRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(EndOfDayRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid end-of-day body: {e}")))
}
