use axum::{extract::State, response::Redirect};

use crate::db;
use crate::extractors::RecordId;
use crate::models::{JoinOutcome, LeaveOutcome, Level};
use crate::notices;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;

fn detail_url(event_id: i64) -> String {
    format!("/event/detail/{event_id}")
}

pub async fn join(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(event_id): RecordId,
) -> Result<Redirect, AppError> {
    let event = db::event::find(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", event_id))?;

    let outcome = db::event_user::join(&state.pool, &event, user.id).await?;
    tracing::info!(event_id, user_id = user.id, ?outcome, "Join attempt");

    let (level, notice) = match outcome {
        JoinOutcome::Joined => (Level::Success, notices::JOINED),
        JoinOutcome::Full => (Level::Error, notices::EVENT_FULL),
        JoinOutcome::AlreadyJoined => (Level::Error, notices::ALREADY_JOINED),
    };
    user.redirect_with(&state.pool, level, notice, &detail_url(event_id))
        .await
}

pub async fn leave(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(event_id): RecordId,
) -> Result<Redirect, AppError> {
    let outcome = db::event_user::leave(&state.pool, event_id, user.id).await?;
    tracing::info!(event_id, user_id = user.id, ?outcome, "Leave attempt");

    let (level, notice) = match outcome {
        LeaveOutcome::Left => (Level::Success, notices::LEFT),
        LeaveOutcome::NotAttending => (Level::Error, notices::NOT_ATTENDING),
    };
    user.redirect_with(&state.pool, level, notice, &detail_url(event_id))
        .await
}
