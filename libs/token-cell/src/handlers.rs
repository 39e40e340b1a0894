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

use crate::models::{CreateTokenRequest, TokenError, TokenListQuery, UpdateTokenStatusRequest};
use crate::services::{TokenIssuerService, TokenQueueService};

fn map_token_error(err: TokenError) -> AppError {
    match err {
        TokenError::PatientNotFound | TokenError::NotFound | TokenError::NoMatchingToken => {
            AppError::NotFound(err.to_string())
        }
        TokenError::MissingFields
        | TokenError::MissingUpdateFields
        | TokenError::AlreadyActive
        | TokenError::InvalidStatus(_) => AppError::BadRequest(err.to_string()),
        TokenError::DatabaseError(_) => AppError::Database(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn generate_token(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = TokenIssuerService::new(&config);

    let token = service.issue(request).await.map_err(map_token_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Token generated", "token": token })),
    ))
}

#[axum::debug_handler]
pub async fn list_tokens(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<TokenListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(map_token_error)?;

    let service = TokenQueueService::new(&config);
    let tokens = service
        .list(query.patient_phone.as_deref(), status)
        .await
        .map_err(map_token_error)?;

    Ok(Json(json!(tokens)))
}

#[axum::debug_handler]
pub async fn waiting_tokens(
    State(config): State<Arc<AppConfig>>,
) -> Result<impl IntoResponse, AppError> {
    let service = TokenQueueService::new(&config);

    let tokens = service.list_waiting().await.map_err(map_token_error)?;

    Ok(Json(json!(tokens)))
}

#[axum::debug_handler]
pub async fn get_token(
    State(config): State<Arc<AppConfig>>,
    Path(token_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = TokenQueueService::new(&config);

    let token = service
        .find_by_id(&token_id)
        .await
        .map_err(map_token_error)?;

    Ok(Json(json!(token)))
}

#[axum::debug_handler]
pub async fn get_latest_token_by_phone(
    State(config): State<Arc<AppConfig>>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = TokenQueueService::new(&config);

    let token = service
        .find_latest_by_phone(&phone)
        .await
        .map_err(map_token_error)?;

    Ok(Json(json!(token)))
}

#[axum::debug_handler]
pub async fn update_token_status(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<UpdateTokenStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = TokenQueueService::new(&config);

    let token = service
        .update_status(request)
        .await
        .map_err(map_token_error)?;

    Ok(Json(json!({
        "message": "Token status updated successfully",
        "token": token
    })))
}
