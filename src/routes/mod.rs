use axum::{
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    accounts, category, chat, event, event_user, handler_404, health_check, index,
};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(index::index))
        .route("/dashboard/", get(index::dashboard))
        .route("/category/list/", get(category::list))
        .route(
            "/category/create/",
            get(category::create_form).post(category::create),
        )
        .route(
            "/category/update/:id",
            get(category::edit_form).post(category::update),
        )
        .route("/event/list/", get(event::list))
        .route("/event/create/", get(event::create_form).post(event::create))
        .route("/event/update/:id", get(event::edit_form).post(event::update))
        .route("/event/mylist/", get(event::my_list))
        .route("/event/detail/:id", get(event::detail))
        .route(
            "/event_user/create/:event_id",
            get(event_user::join).post(event_user::join),
        )
        .route(
            "/event_user/delete/:event_id",
            get(event_user::leave).post(event_user::leave),
        )
        .route("/chat/talk/:event_id", get(chat::talk).post(chat::post))
        .route(
            "/accounts/login/",
            get(accounts::login_form).post(accounts::login),
        )
        .route(
            "/accounts/logout/",
            get(accounts::logout).post(accounts::logout),
        )
        .route("/health", get(health_check))
        .fallback(handler_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(&config))
        .layer(create_cors_layer(&config))
}
