use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_token_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(generate_token))
        .route("/", get(list_tokens))
        .route("/", put(update_token_status))
        .route("/waiting", get(waiting_tokens))
        .route("/phone/{phone}", get(get_latest_token_by_phone))
        .route("/{id}", get(get_token))
        .with_state(config)
}
