use axum::{
    extract::{Query, State},
    response::{Redirect, Response},
};
use serde_json::json;

use crate::db;
use crate::extractors::{RecordId, ValidatedForm};
use crate::forms::CategoryForm;
use crate::models::Level;
use crate::notices;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::pagination::{PageQuery, Paginator};
use crate::utils::response::page;

const LIST_URL: &str = "/category/list/";

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let count = db::category::count(&state.pool).await?;
    let paginator = Paginator::resolve(&query, count)?;
    let categories =
        db::category::list_page(&state.pool, paginator.limit(), paginator.offset()).await?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page("カテゴリ一覧", paginator.into_page(categories), messages))
}

pub async fn create_form(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let messages = user.take_messages(&state.pool).await?;
    Ok(page("カテゴリ新規登録", json!({ "form": { "name": "" } }), messages))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedForm(form): ValidatedForm<CategoryForm>,
) -> Result<Redirect, AppError> {
    let category = db::category::create(&state.pool, &form.name).await?;
    tracing::info!(category_id = category.id, user_id = user.id, "Category created");

    user.redirect_with(&state.pool, Level::Success, notices::CATEGORY_CREATED, LIST_URL)
        .await
}

pub async fn edit_form(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<Response, AppError> {
    let category = db::category::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    let messages = user.take_messages(&state.pool).await?;

    Ok(page(
        "カテゴリ更新",
        json!({ "form": { "name": category.name }, "object": category }),
        messages,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    ValidatedForm(form): ValidatedForm<CategoryForm>,
) -> Result<Redirect, AppError> {
    db::category::update(&state.pool, id, &form.name)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    tracing::info!(category_id = id, user_id = user.id, "Category updated");

    user.redirect_with(&state.pool, Level::Success, notices::CATEGORY_UPDATED, LIST_URL)
        .await
}
