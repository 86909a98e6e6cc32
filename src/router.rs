use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, routes};

/// Callable endpoints, one `POST /<name>` route each.
pub fn callable_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/generateAgoraChatToken",
            post(routes::chat::generate_chat_token),
        )
        .route("/testAuth", post(routes::chat::generate_chat_token))
        .route("/getRtcToken", post(routes::rtc::get_rtc_token))
        .route("/addAgoraUser", post(routes::provision::add_agora_user))
        .route("/addUser", post(routes::provision::add_user))
}

/// Full application router without the network-facing layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(routes::health::ping))
        .merge(callable_routes())
        .with_state(state)
}
