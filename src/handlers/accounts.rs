use axum::{
    extract::{Query, State},
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;

use crate::db;
use crate::extractors::ValidatedForm;
use crate::forms::LoginForm;
use crate::session::{safe_next, session_cookie, SESSION_COOKIE};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::page;

const DEFAULT_REDIRECT: &str = "/dashboard/";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

pub async fn login_form(Query(query): Query<NextQuery>) -> Response {
    let next = safe_next(query.next.as_deref()).unwrap_or(DEFAULT_REDIRECT);
    page(
        "ログイン",
        json!({ "form": { "username": "", "next": next } }),
        Vec::new(),
    )
}

/// Name-only sign-in: unknown names are registered on the spot. Any session
/// the browser already held is replaced.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        db::session::delete(&state.pool, previous.value()).await?;
    }

    let (user, created) = db::user::find_or_create(&state.pool, &form.username).await?;
    let token = db::session::create(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, created, "User logged in");

    let to = safe_next(form.next.as_deref()).unwrap_or(DEFAULT_REDIRECT);
    let jar = jar.add(session_cookie(token, state.config.production));
    Ok((jar, Redirect::to(to)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        db::session::delete(&state.pool, cookie.value()).await?;
        tracing::info!("User logged out");
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    Ok((jar, Redirect::to("/")))
}
