use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_prescription_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_prescription))
        .route("/", get(list_prescriptions))
        .route("/{tokenId}", get(get_prescription_for_token))
        .with_state(config)
}
