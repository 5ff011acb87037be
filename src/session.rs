//! Login state and one-shot flash notices.
//!
//! The session token travels in the `sessionid` cookie. Handlers that need a
//! logged-in user take a [`CurrentUser`]; anonymous requests are redirected to
//! the login page with the original path and query in `next`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sqlx::SqlitePool;

use crate::db;
use crate::models::{FlashMessage, Level};
use crate::state::AppState;
use crate::utils::error::AppError;

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_URL: &str = "/accounts/login/";

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

impl CurrentUser {
    pub async fn flash(&self, pool: &SqlitePool, level: Level, message: &str) -> Result<(), AppError> {
        db::session::push_message(pool, &self.token, level, message).await
    }

    /// Queues `message` and redirects to `to`.
    pub async fn redirect_with(
        &self,
        pool: &SqlitePool,
        level: Level,
        message: &str,
        to: &str,
    ) -> Result<Redirect, AppError> {
        self.flash(pool, level, message).await?;
        Ok(Redirect::to(to))
    }

    pub async fn take_messages(&self, pool: &SqlitePool) -> Result<Vec<FlashMessage>, AppError> {
        db::session::take_messages(pool, &self.token).await
    }
}

#[derive(Debug)]
pub enum AuthRejection {
    LoginRequired { next: String },
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRequired { next } => {
                Redirect::to(&login_url(&next)).into_response()
            }
            AuthRejection::Failed(err) => err.into_response(),
        }
    }
}

/// The login page with `next` percent-encoded into its query.
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string(&[("next", next)]) {
        Ok(query) => format!("{LOGIN_URL}?{query}"),
        Err(err) => {
            tracing::warn!(error = %err, "Session: could not encode next");
            LOGIN_URL.to_string()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let next = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
            return Err(AuthRejection::LoginRequired { next });
        };

        match db::session::find_user(&app_state.pool, &token).await {
            Ok(Some(user)) => Ok(CurrentUser {
                id: user.id,
                username: user.username,
                token,
            }),
            Ok(None) => {
                tracing::debug!("Session: unknown token, asking for login");
                Err(AuthRejection::LoginRequired { next })
            }
            Err(err) => Err(AuthRejection::Failed(err)),
        }
    }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Only local absolute paths are honored, so `next` cannot send the user to
/// another host.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}
