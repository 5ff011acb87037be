#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use event_server::config::Config;
use event_server::db;
use event_server::db::event::NewEvent;
use event_server::routes::create_routes;
use event_server::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// A logged-in browser: the user and the cookie header it sends.
pub struct Session {
    pub user_id: i64,
    pub cookie: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let pool = db::connect_in_memory().await.unwrap();
        let router = create_routes(AppState::new(pool.clone(), Config::default()));
        Self { router, pool }
    }

    pub async fn login(&self, username: &str) -> Session {
        let (user, _) = db::user::find_or_create(&self.pool, username).await.unwrap();
        let token = db::session::create(&self.pool, user.id).await.unwrap();
        Session {
            user_id: user.id,
            cookie: format!("sessionid={token}"),
        }
    }

    pub async fn create_category(&self, name: &str) -> i64 {
        db::category::create(&self.pool, name).await.unwrap().id
    }

    pub async fn create_event(&self, owner: &Session, name: &str, capacity: i64) -> i64 {
        let category_id = self.create_category("General").await;
        let new = NewEvent {
            name,
            number: capacity,
            category_id,
        };
        db::event::create(&self.pool, &new, owner.user_id)
            .await
            .unwrap()
            .id
    }

    pub async fn attendee_count(&self, event_id: i64) -> i64 {
        db::event_user::count_for_event(&self.pool, event_id)
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str, session: Option<&Session>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, &session.cookie);
        }
        let request = builder.body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_form(&self, path: &str, session: Option<&Session>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, &session.cookie);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Fetches a page that must render, returning its JSON context.
    pub async fn page(&self, path: &str, session: &Session) -> Value {
        let response = self.get(path, Some(session)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        body_json(response).await
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Texts of the flash notices in a page context.
pub fn notices(page: &Value) -> Vec<(String, String)> {
    page["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| {
            (
                m["level"].as_str().unwrap().to_string(),
                m["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}
