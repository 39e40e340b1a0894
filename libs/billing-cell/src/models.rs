use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_phone: String,
    /// One bill per visit; the store enforces uniqueness on this key.
    pub token_id: Uuid,
    /// Total due after the consultation discount.
    pub amount: f64,
    pub paid_amount: f64,
    pub return_amount: f64,
    pub discount: f64,
    pub created_at: DateTime<Utc>,
}

/// Payment body as the desk submits it. `patient` and `token` carry the
/// record ids, matching the names the billing form has always sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub patient: Option<String>,
    pub patient_phone: Option<String>,
    pub token: Option<String>,
    pub amount: Option<f64>,
    pub paid_amount: Option<f64>,
    /// Ignored; the change due is recomputed server-side.
    pub return_amount: Option<f64>,
    pub discount: Option<f64>,
}

/// Pre-payment bill for a seen visit, with the patient display fields the
/// desk prints on the slip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillQuote {
    pub token_id: Uuid,
    pub token_number: i64,
    pub name: String,
    pub phone: String,
    pub age: Option<i32>,
    pub issue: String,
    pub doctor_fee: f64,
    pub medicine_fee: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BillingError {
    #[error("patient, token, amount and paidAmount are required")]
    MissingFields,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token must be seen before billing")]
    TokenNotSeen,

    #[error("Patient has not paid full amount!")]
    Underpaid,

    #[error("Prescription not found")]
    PrescriptionNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for BillingError {
    fn from(err: shared_database::StoreError) -> Self {
        BillingError::DatabaseError(err.to_string())
    }
}
