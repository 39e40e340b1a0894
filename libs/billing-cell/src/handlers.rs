use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BillingError, RecordPaymentRequest};
use crate::services::BillingService;

fn map_billing_error(err: BillingError) -> AppError {
    match err {
        BillingError::TokenNotFound | BillingError::PrescriptionNotFound => {
            AppError::NotFound(err.to_string())
        }
        BillingError::MissingFields | BillingError::TokenNotSeen | BillingError::Underpaid => {
            AppError::BadRequest(err.to_string())
        }
        BillingError::DatabaseError(_) => AppError::Database(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn record_payment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = BillingService::new(&config);

    let billing = service
        .record_payment(request)
        .await
        .map_err(map_billing_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Billing saved",
            "billing": billing
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_bill_quote(
    State(config): State<Arc<AppConfig>>,
    Path(token_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = BillingService::new(&config);

    let quote = service.quote(&token_id).await.map_err(map_billing_error)?;

    Ok(Json(json!(quote)))
}
