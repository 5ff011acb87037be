use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod accounts;
pub mod category;
pub mod chat;
pub mod event;
pub mod event_user;
pub mod index;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "event-server",
    };

    success(payload, "Health check successful").into_response()
}

pub async fn handler_404() -> Response {
    AppError::NotFound("No route matches this path".to_string()).into_response()
}
