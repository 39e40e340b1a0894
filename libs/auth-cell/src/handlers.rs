use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AuthError, LoginRequest};
use crate::services::AuthService;

fn map_auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::MissingCredentials => AppError::BadRequest(err.to_string()),
        AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
        AuthError::DatabaseError(_) => AppError::Database(err.to_string()),
    }
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&config);

    let member = service.login(request).await.map_err(map_auth_error)?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": {
            "id": member.id,
            "name": member.name,
            "email": member.email,
            "role": member.role
        }
    })))
}
