use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use patient_cell::models::Patient;

/// Lifecycle of a visit token. `completed` and `absent` are terminal; the
/// only legal moves are waiting→seen, waiting→absent and seen→completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Waiting,
    Seen,
    Completed,
    Absent,
}

impl TokenStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenStatus::Completed | TokenStatus::Absent)
    }

    pub fn can_transition_to(&self, target: &TokenStatus) -> bool {
        use TokenStatus::*;
        match (self, target) {
            (Waiting, Seen) => true,
            (Waiting, Absent) => true,
            (Seen, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenStatus::Waiting => "waiting",
            TokenStatus::Seen => "seen",
            TokenStatus::Completed => "completed",
            TokenStatus::Absent => "absent",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TokenStatus {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "waiting" => Ok(TokenStatus::Waiting),
            "seen" => Ok(TokenStatus::Seen),
            "completed" => Ok(TokenStatus::Completed),
            "absent" => Ok(TokenStatus::Absent),
            other => Err(TokenError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: Uuid,
    /// Globally sequential queue number, unique across all tokens ever issued.
    pub token_number: i64,
    pub patient_id: Uuid,
    pub patient_phone: String,
    pub status: TokenStatus,
    #[serde(default)]
    pub issue: String,
    pub created_at: DateTime<Utc>,
    /// Present when the row was fetched with its patient embedded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub patient_id: Option<String>,
    pub issue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenStatusRequest {
    pub patient_phone: Option<String>,
    pub current_status: Option<String>,
    pub new_status: Option<String>,
    pub new_issue: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListQuery {
    pub patient_phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("Patient and issue are required")]
    MissingFields,

    #[error("patientPhone, currentStatus and newStatus are required")]
    MissingUpdateFields,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Token already exists")]
    AlreadyActive,

    #[error("Token not found")]
    NotFound,

    #[error("Token not found for this phone with current status")]
    NoMatchingToken,

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for TokenError {
    fn from(err: shared_database::StoreError) -> Self {
        TokenError::DatabaseError(err.to_string())
    }
}
