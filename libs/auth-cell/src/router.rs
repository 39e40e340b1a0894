use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::login;

pub fn create_auth_router(config: Arc<AppConfig>) -> Router {
    Router::new().route("/login", post(login)).with_state(config)
}
