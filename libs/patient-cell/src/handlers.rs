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

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::PatientService;

fn map_patient_error(err: PatientError) -> AppError {
    match err {
        PatientError::NotFound => AppError::NotFound(err.to_string()),
        PatientError::InvalidPhone
        | PatientError::PhoneAlreadyExists
        | PatientError::ValidationError(_) => AppError::BadRequest(err.to_string()),
        PatientError::DatabaseError(_) => AppError::Database(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn register_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = PatientService::new(&config);

    let patient = service.register(request).await.map_err(map_patient_error)?;

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
) -> Result<impl IntoResponse, AppError> {
    let service = PatientService::new(&config);

    let patients = service.list_all().await.map_err(map_patient_error)?;

    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn get_patient_by_phone(
    State(config): State<Arc<AppConfig>>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = PatientService::new(&config);

    let patient = service
        .find_by_phone(&phone)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = PatientService::new(&config);

    let patient = service
        .find_by_id(&patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = PatientService::new(&config);

    let patient = service
        .update(&patient_id, request)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}
