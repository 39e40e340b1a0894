use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::router::create_auth_router;
use billing_cell::router::create_billing_router;
use patient_cell::router::create_patient_router;
use prescription_cell::router::create_prescription_router;
use shared_config::AppConfig;
use token_cell::router::create_token_router;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Desk API is running!" }))
        .nest("/auth", create_auth_router(state.clone()))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/token", create_token_router(state.clone()))
        .nest("/prescriptions", create_prescription_router(state.clone()))
        .nest("/billing", create_billing_router(state))
}
