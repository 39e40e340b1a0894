use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreatePrescriptionRequest, PrescriptionError, PrescriptionListQuery};
use crate::services::PrescriptionService;

fn map_prescription_error(err: PrescriptionError) -> AppError {
    match err {
        PrescriptionError::TokenNotFound | PrescriptionError::NotFound => {
            AppError::NotFound(err.to_string())
        }
        PrescriptionError::MissingTokenId
        | PrescriptionError::VisitClosed
        | PrescriptionError::InvalidDiscount => AppError::BadRequest(err.to_string()),
        PrescriptionError::DatabaseError(_) => AppError::Database(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn create_prescription(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = PrescriptionService::new(&config);

    let prescription = service
        .create(request)
        .await
        .map_err(map_prescription_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Prescription created",
            "prescription": prescription
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_prescription_for_token(
    State(config): State<Arc<AppConfig>>,
    Path(token_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = PrescriptionService::new(&config);

    let (token, prescription) = service
        .get_for_token(&token_id)
        .await
        .map_err(map_prescription_error)?;

    Ok(Json(json!({
        "token": token,
        "prescription": prescription
    })))
}

#[axum::debug_handler]
pub async fn list_prescriptions(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PrescriptionListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = PrescriptionService::new(&config);

    let prescriptions = service
        .list(query.patient_phone.as_deref())
        .await
        .map_err(map_prescription_error)?;

    Ok(Json(json!(prescriptions)))
}
