use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A staff account as stored: doctor or receptionist. The `password` field
/// holds the argon2 PHC string and must never be serialized back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Email and password required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for AuthError {
    fn from(err: shared_database::StoreError) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}
