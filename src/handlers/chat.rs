use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::db;
use crate::extractors::RecordId;
use crate::forms::ChatForm;
use crate::models::{ChatMessage, EventSummary, Level};
use crate::notices;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::page;

#[derive(Serialize)]
struct ChatThread {
    object: EventSummary,
    object_list: Vec<ChatMessage>,
}

/// Only attendees reach the thread; everyone else goes back to the event.
async fn deny_unless_attending(
    pool: &SqlitePool,
    user: &CurrentUser,
    event_id: i64,
) -> Result<Option<Redirect>, AppError> {
    if db::event_user::is_attending(pool, event_id, user.id).await? {
        return Ok(None);
    }
    tracing::info!(event_id, user_id = user.id, "Chat access denied: not attending");
    let redirect = user
        .redirect_with(
            pool,
            Level::Error,
            notices::NOT_ATTENDING,
            &format!("/event/detail/{event_id}"),
        )
        .await?;
    Ok(Some(redirect))
}

pub async fn talk(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(event_id): RecordId,
) -> Result<Response, AppError> {
    if let Some(denied) = deny_unless_attending(&state.pool, &user, event_id).await? {
        return Ok(denied.into_response());
    }

    let event = db::event::find_summary(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", event_id))?;
    let chats = db::chat::list_for_event(&state.pool, event_id).await?;
    let messages = user.take_messages(&state.pool).await?;

    let thread = ChatThread {
        object: event,
        object_list: chats,
    };
    Ok(page("チャット", thread, messages))
}

pub async fn post(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(event_id): RecordId,
    form: Result<Form<ChatForm>, FormRejection>,
) -> Result<Response, AppError> {
    if let Some(denied) = deny_unless_attending(&state.pool, &user, event_id).await? {
        return Ok(denied.into_response());
    }

    let Form(form) = form?;
    form.validate()?;

    let chat = db::chat::create(&state.pool, event_id, user.id, &form.body).await?;
    tracing::info!(chat_id = chat.id, event_id, user_id = user.id, "Chat posted");

    let redirect = user
        .redirect_with(
            &state.pool,
            Level::Success,
            notices::CHAT_POSTED,
            &format!("/chat/talk/{event_id}"),
        )
        .await?;
    Ok(redirect.into_response())
}
