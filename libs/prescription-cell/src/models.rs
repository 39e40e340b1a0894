use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use patient_cell::models::Patient;

/// One line of a prescription: what to take, how and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dose: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub before_meal: bool,
    #[serde(default)]
    pub after_meal: bool,
    #[serde(default)]
    pub morning: bool,
    #[serde(default)]
    pub noon: bool,
    #[serde(default)]
    pub night: bool,
    /// Unit price, summed into the bill's medicine fee when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_phone: String,
    /// The visit this prescription belongs to. Exactly one prescription is
    /// expected per token.
    pub token_id: Uuid,
    #[serde(default)]
    pub meds: Vec<MedicineEntry>,
    #[serde(default)]
    pub notes: String,
    /// Doctor-granted percentage off the consultation fee, 0 to 100.
    #[serde(default)]
    pub discount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub token_id: Option<String>,
    pub meds: Option<Vec<MedicineEntry>>,
    pub notes: Option<String>,
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionListQuery {
    pub patient_phone: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PrescriptionError {
    #[error("Token ID is required")]
    MissingTokenId,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Prescription not found")]
    NotFound,

    #[error("Cannot prescribe against a completed or absent token")]
    VisitClosed,

    #[error("Discount must be between 0 and 100")]
    InvalidDiscount,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for PrescriptionError {
    fn from(err: shared_database::StoreError) -> Self {
        PrescriptionError::DatabaseError(err.to_string())
    }
}
