use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::db;
use crate::db::event::NewEvent;
use crate::extractors::{RecordId, ValidatedForm};
use crate::forms::EventForm;
use crate::models::{Attendee, EventSummary, Level};
use crate::notices;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::pagination::{PageQuery, Paginator};
use crate::utils::response::page;

const LIST_URL: &str = "/event/list/";
const MY_LIST_URL: &str = "/event/mylist/";

#[derive(Serialize)]
struct EventDetail {
    event: EventSummary,
    attendees: Vec<Attendee>,
    attendee_count: usize,
    is_attended: bool,
}

/// The category must name an existing row; the form alone cannot tell.
async fn check_category(pool: &SqlitePool, form: &EventForm) -> Result<(), AppError> {
    if db::category::exists(pool, form.category).await? {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    errors.add("category", ValidationError::new("does_not_exist"));
    Err(AppError::ValidationError(errors))
}

fn changes(form: &EventForm) -> NewEvent<'_> {
    NewEvent {
        name: &form.name,
        number: form.number,
        category_id: form.category,
    }
}

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let count = db::event::count(&state.pool).await?;
    let paginator = Paginator::resolve(&query, count)?;
    let events = db::event::list_page(&state.pool, paginator.limit(), paginator.offset()).await?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page("イベント一覧", paginator.into_page(events), messages))
}

pub async fn my_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let count = db::event::count_by_owner(&state.pool, user.id).await?;
    let paginator = Paginator::resolve(&query, count)?;
    let events = db::event::list_page_by_owner(
        &state.pool,
        user.id,
        paginator.limit(),
        paginator.offset(),
    )
    .await?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page("マイイベント一覧", paginator.into_page(events), messages))
}

pub async fn create_form(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let categories = db::category::list_all(&state.pool).await?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page(
        "イベント新規登録",
        json!({
            "form": { "name": "", "number": 0, "category": null, "user": user.id },
            "categories": categories,
        }),
        messages,
    ))
}

/// The requester always becomes the owner.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedForm(form): ValidatedForm<EventForm>,
) -> Result<Redirect, AppError> {
    check_category(&state.pool, &form).await?;
    let event = db::event::create(&state.pool, &changes(&form), user.id).await?;
    tracing::info!(event_id = event.id, user_id = user.id, capacity = event.number, "Event created");

    user.redirect_with(&state.pool, Level::Success, notices::EVENT_CREATED, LIST_URL)
        .await
}

async fn deny_unless_owner(
    pool: &SqlitePool,
    user: &CurrentUser,
    event_id: i64,
) -> Result<Option<Redirect>, AppError> {
    if db::event::is_owner(pool, event_id, user.id).await? {
        return Ok(None);
    }
    tracing::info!(event_id, user_id = user.id, "Event update denied: not the owner");
    let redirect = user
        .redirect_with(pool, Level::Error, notices::ONLY_MY_EVENTS, MY_LIST_URL)
        .await?;
    Ok(Some(redirect))
}

pub async fn edit_form(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Response, AppError> {
    if let Some(denied) = deny_unless_owner(&state.pool, &user, id).await? {
        return Ok(denied.into_response());
    }

    let event = db::event::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    let categories = db::category::list_all(&state.pool).await?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page(
        "イベント更新",
        json!({
            "form": {
                "name": event.name,
                "number": event.number,
                "category": event.category_id,
                "user": event.user_id,
            },
            "object": event,
            "categories": categories,
        }),
        messages,
    ))
}

/// Ownership is checked before the form is looked at.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    form: Result<Form<EventForm>, FormRejection>,
) -> Result<Response, AppError> {
    if let Some(denied) = deny_unless_owner(&state.pool, &user, id).await? {
        return Ok(denied.into_response());
    }

    let Form(form) = form?;
    form.validate()?;
    check_category(&state.pool, &form).await?;

    db::event::update(&state.pool, id, &changes(&form))
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    tracing::info!(event_id = id, user_id = user.id, "Event updated");

    let redirect = user
        .redirect_with(&state.pool, Level::Success, notices::EVENT_UPDATED, MY_LIST_URL)
        .await?;
    Ok(redirect.into_response())
}

pub async fn detail(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Response, AppError> {
    let event = db::event::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    let attendees = db::event_user::attendees(&state.pool, id).await?;
    let is_attended = db::event_user::is_attending(&state.pool, id, user.id).await?;
    let messages = user.take_messages(&state.pool).await?;

    let detail = EventDetail {
        event,
        attendee_count: attendees.len(),
        attendees,
        is_attended,
    };
    Ok(page("イベント詳細", detail, messages))
}
