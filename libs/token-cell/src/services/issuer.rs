use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use patient_cell::models::Patient;

use crate::models::{CreateTokenRequest, Token, TokenError};

pub struct TokenIssuerService {
    store: StoreClient,
    max_claim_attempts: u32,
}

impl TokenIssuerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            max_claim_attempts: 3,
        }
    }

    /// Issue the next queue token for a patient. The patient must exist and
    /// must not already hold a waiting token. The sequential number is
    /// claimed against the store's unique index on `tokenNumber`: a rival
    /// issuance that grabs the same number surfaces as a conflict, and the
    /// claim is re-read and retried.
    pub async fn issue(&self, request: CreateTokenRequest) -> Result<Token, TokenError> {
        let patient_id = request.patient_id.as_deref().unwrap_or("").trim().to_string();
        let issue = request.issue.as_deref().unwrap_or("").trim().to_string();

        if patient_id.is_empty() || issue.is_empty() {
            return Err(TokenError::MissingFields);
        }

        let patient = self.find_patient(&patient_id).await?;

        let active_path = format!(
            "/rest/v1/tokens?patientId=eq.{}&status=eq.waiting&limit=1",
            urlencoding::encode(&patient_id)
        );
        let active: Vec<Token> = self.store.select(&active_path).await?;
        if !active.is_empty() {
            return Err(TokenError::AlreadyActive);
        }

        for attempt in 1..=self.max_claim_attempts {
            let next_number = self.current_max_number().await? + 1;
            debug!(
                "Claiming token number {} for patient {} (attempt {})",
                next_number, patient_id, attempt
            );

            let token_data = json!({
                "id": Uuid::new_v4(),
                "tokenNumber": next_number,
                "patientId": patient.id,
                "patientPhone": patient.phone.trim(),
                "status": "waiting",
                "issue": issue,
                "createdAt": chrono::Utc::now().to_rfc3339()
            });

            match self.store.insert::<Token>("/rest/v1/tokens", token_data).await {
                Ok(rows) => {
                    return rows.into_iter().next().ok_or_else(|| {
                        TokenError::DatabaseError("Failed to create token".to_string())
                    });
                }
                Err(StoreError::Conflict(_)) if attempt < self.max_claim_attempts => {
                    warn!(
                        "Token number {} was claimed concurrently, retrying {}/{}",
                        next_number, attempt, self.max_claim_attempts
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(50 * attempt as u64))
                        .await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TokenError::DatabaseError(
            "Failed to claim a token number after multiple attempts".to_string(),
        ))
    }

    async fn find_patient(&self, patient_id: &str) -> Result<Patient, TokenError> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}",
            urlencoding::encode(patient_id)
        );
        let result: Vec<Patient> = self.store.select(&path).await?;

        result.into_iter().next().ok_or(TokenError::PatientNotFound)
    }

    async fn current_max_number(&self) -> Result<i64, TokenError> {
        let rows: Vec<Token> = self
            .store
            .select("/rest/v1/tokens?order=tokenNumber.desc&limit=1")
            .await?;
        Ok(rows.first().map(|t| t.token_number).unwrap_or(0))
    }
}
