use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn create_patient_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(register_patient))
        .route("/", get(list_patients))
        .route("/phone/{phone}", get(get_patient_by_phone))
        .route("/{id}", get(get_patient))
        .route("/{id}", put(update_patient))
        .with_state(config)
}
