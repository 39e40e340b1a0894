use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::{get_bill_quote, record_payment};

pub fn create_billing_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(record_payment))
        .route("/quote/{tokenId}", get(get_bill_quote))
        .with_state(config)
}
