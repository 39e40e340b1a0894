use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;

use patient_cell::models::{HistoryEntry, Patient};
use token_cell::models::{Token, TokenError, TokenStatus};
use token_cell::services::TokenQueueService;

use crate::models::{CreatePrescriptionRequest, Prescription, PrescriptionError};

pub struct PrescriptionService {
    store: StoreClient,
    tokens: TokenQueueService,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
            tokens: TokenQueueService::new(config),
        }
    }

    /// Record the doctor's prescription for a visit. The token is moved to
    /// `seen` if it was still waiting, and the entry is appended to the
    /// patient's history. Closed visits cannot be prescribed against.
    pub async fn create(
        &self,
        request: CreatePrescriptionRequest,
    ) -> Result<Prescription, PrescriptionError> {
        let token_id = request.token_id.as_deref().unwrap_or("").trim().to_string();
        if token_id.is_empty() {
            return Err(PrescriptionError::MissingTokenId);
        }

        let token = self.find_token(&token_id).await?;
        if token.status.is_terminal() {
            return Err(PrescriptionError::VisitClosed);
        }

        let discount = request.discount.unwrap_or(0.0);
        if !(0.0..=100.0).contains(&discount) {
            return Err(PrescriptionError::InvalidDiscount);
        }

        let meds = request.meds.unwrap_or_default();
        let notes = request.notes.unwrap_or_default();
        let now = Utc::now();

        let prescription_data = json!({
            "id": Uuid::new_v4(),
            "patientId": token.patient_id,
            "patientPhone": token.patient_phone,
            "tokenId": token.id,
            "meds": meds,
            "notes": notes,
            "discount": discount,
            "createdAt": now.to_rfc3339()
        });

        let rows: Vec<Prescription> = self
            .store
            .insert("/rest/v1/prescriptions", prescription_data)
            .await?;
        let prescription = rows.into_iter().next().ok_or_else(|| {
            PrescriptionError::DatabaseError("Failed to create prescription".to_string())
        })?;

        debug!(
            "Prescription {} recorded for token {}",
            prescription.id, token.id
        );

        self.mark_token_seen(&token).await?;
        self.append_patient_history(&token, &prescription).await?;

        Ok(prescription)
    }

    /// The visit's record: the token plus the prescription written against it.
    pub async fn get_for_token(
        &self,
        token_id: &str,
    ) -> Result<(Token, Prescription), PrescriptionError> {
        let token = self.find_token(token_id).await?;

        let path = format!(
            "/rest/v1/prescriptions?tokenId=eq.{}&order=createdAt.desc&limit=1",
            urlencoding::encode(token_id)
        );
        let rows: Vec<Prescription> = self.store.select(&path).await?;
        let prescription = rows.into_iter().next().ok_or(PrescriptionError::NotFound)?;

        Ok((token, prescription))
    }

    pub async fn list(
        &self,
        patient_phone: Option<&str>,
    ) -> Result<Vec<Prescription>, PrescriptionError> {
        let mut path = String::from("/rest/v1/prescriptions?select=*,patient:patients(*)");
        if let Some(phone) = patient_phone {
            path.push_str(&format!(
                "&patientPhone=eq.{}",
                urlencoding::encode(phone.trim())
            ));
        }
        path.push_str("&order=createdAt.desc");

        let prescriptions: Vec<Prescription> = self.store.select(&path).await?;
        Ok(prescriptions)
    }

    async fn find_token(&self, token_id: &str) -> Result<Token, PrescriptionError> {
        self.tokens.find_by_id(token_id).await.map_err(|e| match e {
            TokenError::NotFound => PrescriptionError::TokenNotFound,
            other => PrescriptionError::DatabaseError(other.to_string()),
        })
    }

    /// waiting -> seen, conditionally on the status not having moved under
    /// us. A token that is already seen stays as it is.
    async fn mark_token_seen(&self, token: &Token) -> Result<(), PrescriptionError> {
        if token.status != TokenStatus::Waiting {
            return Ok(());
        }

        let path = format!("/rest/v1/tokens?id=eq.{}&status=eq.waiting", token.id);
        let updated: Vec<Token> = self
            .store
            .update(&path, json!({ "status": "seen" }))
            .await?;

        if updated.is_empty() {
            warn!(
                "Token {} changed status before it could be marked seen",
                token.id
            );
        }

        Ok(())
    }

    async fn append_patient_history(
        &self,
        token: &Token,
        prescription: &Prescription,
    ) -> Result<(), PrescriptionError> {
        let patient = match &token.patient {
            Some(patient) => patient.clone(),
            None => self.load_patient(&token.patient_id.to_string()).await?,
        };

        let mut history = patient.history;
        history.push(HistoryEntry {
            date: prescription.created_at,
            notes: prescription.notes.clone(),
            prescription: Some(prescription.id),
        });

        let path = format!("/rest/v1/patients?id=eq.{}", patient.id);
        let _: Vec<Patient> = self
            .store
            .update(
                &path,
                json!({
                    "history": history,
                    "updatedAt": Utc::now().to_rfc3339()
                }),
            )
            .await?;

        Ok(())
    }

    async fn load_patient(&self, patient_id: &str) -> Result<Patient, PrescriptionError> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}",
            urlencoding::encode(patient_id)
        );
        let rows: Vec<Patient> = self.store.select(&path).await?;

        rows.into_iter().next().ok_or_else(|| {
            PrescriptionError::DatabaseError("Patient record missing for token".to_string())
        })
    }
}
