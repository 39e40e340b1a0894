use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a patient's visit history, appended whenever a prescription
/// is written for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub notes: String,
    pub prescription: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// 11-digit contact number, unique across the registry. This is the
    /// external key the front desk works with.
    pub phone: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_contact: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
}

/// Partial update: only name, age and phone are editable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Phone number must be 11 digits")]
    InvalidPhone,

    #[error("Patient with this contact already exists.")]
    PhoneAlreadyExists,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for PatientError {
    fn from(err: shared_database::StoreError) -> Self {
        PatientError::DatabaseError(err.to_string())
    }
}
