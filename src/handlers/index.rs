use axum::{
    extract::{Query, State},
    response::Response,
};
use serde_json::json;

use crate::db;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::pagination::{PageQuery, Paginator};
use crate::utils::response::page;

/// Public front page; logged-in visitors also get their pending notices.
pub async fn index(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let count = db::event::count(&state.pool).await?;
    let paginator = Paginator::resolve(&query, count)?;
    let events = db::event::list_page(&state.pool, paginator.limit(), paginator.offset()).await?;

    let messages = match user {
        Some(user) => user.take_messages(&state.pool).await?,
        None => Vec::new(),
    };

    Ok(page("イベント一覧", paginator.into_page(events), messages))
}

pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let messages = user.take_messages(&state.pool).await?;
    Ok(page(
        "宴会くん",
        json!({ "user_id": user.id, "username": user.username }),
        messages,
    ))
}
